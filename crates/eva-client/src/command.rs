//! Control command taxonomy.
//!
//! Commands are a closed enum matched exhaustively by the router; the set of
//! operations is statically verifiable. Mutually-exclusive selectors
//! (`--shutdown`/`--drain`, `--productinstance`/`--datainstance`) are encoded
//! as nested enums, so a `Command` carrying both or neither cannot be
//! constructed. The CLI parser enforces the same constraint at parse time.

use uuid::Uuid;

use crate::payload::Payload;

/// A validated control command, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Unsigned liveness probe (`GET /health`).
    Health,
    /// Signed lifecycle request (`POST /control/<action>`).
    Control(ControlAction),
    /// Signed reprocessing request (`POST /process/<target>`).
    Process {
        /// Adapter that should pick up the instance.
        adapter: String,
        /// Exactly one of productinstance/datainstance.
        target: ProcessTarget,
    },
    /// Unsigned full snapshot of the job queue (`GET /jobs`).
    JobsList,
    /// Signed deletion of a single queued job (`DELETE /jobs/<job_id>`).
    JobsDelete {
        /// Identifier of the job to delete.
        job_id: String,
    },
}

/// Lifecycle action requested from the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Finish running jobs, then terminate.
    Shutdown,
    /// Stop accepting new events, keep processing queued jobs.
    Drain,
}

impl ControlAction {
    /// URL path segment under `/control/`.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            ControlAction::Shutdown => "shutdown",
            ControlAction::Drain => "drain",
        }
    }
}

/// The resource a `process` command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessTarget {
    /// Reprocess a product instance by UUID.
    ProductInstance(Uuid),
    /// Reprocess a data instance by UUID.
    DataInstance(Uuid),
}

impl ProcessTarget {
    /// URL path segment under `/process/`.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            ProcessTarget::ProductInstance(_) => "productinstance",
            ProcessTarget::DataInstance(_) => "datainstance",
        }
    }

    /// The targeted UUID, whichever variant carries it.
    #[must_use]
    pub fn uuid(self) -> Uuid {
        match self {
            ProcessTarget::ProductInstance(uuid) | ProcessTarget::DataInstance(uuid) => uuid,
        }
    }
}

impl Command {
    /// Build the request payload for this command.
    ///
    /// Only `Process` carries parameters; every other signed command sends
    /// an empty `{}` body, and unsigned GETs ignore the payload entirely.
    #[must_use]
    pub fn payload(&self) -> Payload {
        match self {
            Command::Process { adapter, target } => {
                let mut payload = Payload::empty();
                payload.insert("adapter", adapter.as_str());
                payload.insert("uuid", target.uuid().to_string());
                payload
            }
            _ => Payload::empty(),
        }
    }
}
