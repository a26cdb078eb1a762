//! Error types for the EVA control client.

use thiserror::Error;

/// Errors that can occur while issuing a control command.
///
/// No error here is ever retried: every failure is logged and converted to
/// a nonzero process exit code.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The external signing capability exited nonzero. Always fatal; the
    /// command aborts before any network I/O.
    #[error("signing failed: external signer exited with status {status}")]
    SigningFailure {
        /// Exit status reported by the signer, -1 if killed by a signal.
        status: i32,
        /// Captured standard-error lines from the signer.
        diagnostics: Vec<String>,
    },

    /// The configured server address does not parse as a URL.
    #[error("invalid server URL: {0}")]
    InvalidServerUrl(String),

    /// Could not reach the EVA instance at all. Maps to exit code 2.
    #[error("connection failed: {0}")]
    ConnectionFailure(String),

    /// Client-side HTTP failure other than connectivity.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but the body did not parse as expected.
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),

    /// Payload serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure while spawning or talking to the signer subprocess.
    #[error("failed to run external signer: {0}")]
    SignerIo(#[from] std::io::Error),
}

impl ControlError {
    /// Translate this error to a process exit code.
    ///
    /// Connection failures exit with 2; every other failure exits with 1.
    /// Success (a 2xx response) exits with 0 and never reaches this path.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            ControlError::ConnectionFailure(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failure_exits_2() {
        let err = ControlError::ConnectionFailure("no route".to_string());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn signing_failure_exits_1() {
        let err = ControlError::SigningFailure {
            status: 2,
            diagnostics: vec!["gpg: no secret key".to_string()],
        };
        assert_eq!(err.exit_code(), 1);
    }
}
