//! # EVA Client
//!
//! Signed HTTP control channel for EVA event-processing instances.
//!
//! ## Architecture
//!
//! A parsed [`Command`] flows linearly through the crate:
//!
//! ```text
//! Command ──► CommandRouter ──► Payload ──► Signer ──► HttpTransport ──► ResponseOutcome
//! ```
//!
//! - **Command Layer** (`command`): Closed enum over the control operations.
//!   Mutually-exclusive selectors are structural; a `Command` cannot encode
//!   an invalid combination.
//! - **Payload Layer** (`payload`): Insertion-ordered JSON body for signed
//!   requests.
//! - **Signer Layer** (`signer`): Scoped subprocess around the external
//!   detached-signing capability. Signature lines become numbered
//!   `X-EVA-Request-Signature-NNN` headers.
//! - **Transport Layer** (`transport`): URL construction, header assembly,
//!   and the HTTP call itself. Connection failures are a distinct error
//!   class from HTTP error statuses.
//! - **Response Layer** (`response`): Maps an HTTP outcome to a log line and
//!   a process exit code.
//!
//! Every value lives for a single command invocation; nothing is shared or
//! persisted between runs.

pub mod command;
pub mod error;
pub mod jobs;
pub mod payload;
pub mod response;
pub mod router;
pub mod signer;
pub mod transport;

pub use command::{Command, ControlAction, ProcessTarget};
pub use error::ControlError;
pub use jobs::Job;
pub use payload::Payload;
pub use response::ResponseOutcome;
pub use router::CommandRouter;
pub use signer::{Signature, Signer};
pub use transport::{HttpMethod, HttpTransport, DEFAULT_TIMEOUT_SECS};
