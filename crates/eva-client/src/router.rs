//! Maps a validated command to its transport, path, and payload.

use crate::command::Command;
use crate::error::ControlError;
use crate::jobs;
use crate::response::ResponseOutcome;
use crate::transport::{HttpMethod, HttpTransport};

/// Dispatches commands over the HTTP channel.
///
/// The router assumes well-formed commands; mutually-exclusive selector
/// validation already happened at parse time.
pub struct CommandRouter {
    transport: HttpTransport,
}

impl CommandRouter {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Dispatch a command and return the raw outcome for interpretation.
    pub async fn run(&self, command: &Command) -> Result<ResponseOutcome, ControlError> {
        match command {
            Command::Health => {
                let url = self.transport.url(&["health"]);
                self.transport.get(&url).await
            }
            Command::Control(action) => {
                let url = self.transport.url(&["control", action.path_segment()]);
                self.transport
                    .send_signed(HttpMethod::Post, &url, &command.payload())
                    .await
            }
            Command::Process { target, .. } => {
                let url = self.transport.url(&["process", target.path_segment()]);
                self.transport
                    .send_signed(HttpMethod::Post, &url, &command.payload())
                    .await
            }
            Command::JobsList => {
                let url = self.transport.url(&["jobs"]);
                let outcome = self.transport.get(&url).await?;
                if outcome.is_success() {
                    let listing = jobs::parse_jobs(&outcome.body)?;
                    jobs::log_jobs(&listing);
                }
                Ok(outcome)
            }
            Command::JobsDelete { job_id } => {
                let url = self.transport.url(&["jobs", job_id]);
                self.transport
                    .send_signed(HttpMethod::Delete, &url, &command.payload())
                    .await
            }
        }
    }
}
