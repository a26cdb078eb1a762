//! External detached-signing capability, run as a scoped subprocess.
//!
//! The signer runs as a child process; this crate holds no key material of
//! its own. The payload goes to the child's standard input, its
//! standard output becomes the [`Signature`], and its standard error is
//! captured for diagnostics. A nonzero exit is always fatal: no retry, no
//! fallback, the whole command aborts before any network I/O.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::error::ControlError;

/// Header name prefix for signature lines on signed requests.
pub const SIGNATURE_HEADER_PREFIX: &str = "X-EVA-Request-Signature-";

/// Ordered, opaque signature lines emitted by the external signer.
///
/// Order is significant: line *i* (0-based) is re-exposed as the 1-indexed
/// header `X-EVA-Request-Signature-00i+1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<String>);

impl Signature {
    /// The raw signature lines, in signer output order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    /// Number of signature lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the signer emitted no output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numbered signature headers: `X-EVA-Request-Signature-001` and up,
    /// 3-digit zero-padded, in the order the signer emitted the lines.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, line)| {
                (
                    format!("{}{:03}", SIGNATURE_HEADER_PREFIX, index + 1),
                    line.clone(),
                )
            })
            .collect()
    }
}

/// Invokes the external signing program over a serialized payload.
#[derive(Debug, Clone)]
pub struct Signer {
    program: String,
    args: Vec<String>,
}

impl Signer {
    /// Default signing program.
    pub const DEFAULT_PROGRAM: &'static str = "gpg";

    /// A signer producing ASCII-armored detached signatures with `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec!["--detach-sign".to_string(), "--armor".to_string()],
        }
    }

    /// Sign with a specific key (`--local-user <key>`).
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.args.push("--local-user".to_string());
        self.args.push(key.to_string());
        self
    }

    /// A signer with a fully custom argument list.
    #[must_use]
    pub fn with_args(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Run the signer over `payload` and collect its output lines.
    ///
    /// The child is owned by this scope and killed on drop, so the process
    /// is released on every exit path. On nonzero exit every captured
    /// stderr line is logged at error severity before the failure
    /// propagates.
    pub async fn sign(&self, payload: &str) -> Result<Signature, ControlError> {
        debug!(program = %self.program, "invoking external signer");

        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // a signer that fails before consuming stdin closes its end of
            // the pipe; the exit status is the verdict then, not the write
            match stdin.write_all(payload.as_bytes()).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(err) => return Err(err.into()),
            }
            // dropping stdin closes the pipe so the signer sees EOF
        }

        let output = child.wait_with_output().await?;
        let diagnostics: Vec<String> = String::from_utf8_lossy(&output.stderr)
            .lines()
            .map(str::to_string)
            .collect();

        if !output.status.success() {
            for line in &diagnostics {
                error!(signer = %self.program, "{}", line);
            }
            return Err(ControlError::SigningFailure {
                status: output.status.code().unwrap_or(-1),
                diagnostics,
            });
        }

        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();
        Ok(Signature(lines))
    }
}

impl Default for Signer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(lines: &[&str]) -> Signature {
        Signature(lines.iter().map(|l| (*l).to_string()).collect())
    }

    #[test]
    fn headers_are_numbered_and_ordered() {
        let sig = signature(&["first", "second", "third"]);
        let headers = sig.headers();
        assert_eq!(
            headers,
            vec![
                ("X-EVA-Request-Signature-001".to_string(), "first".to_string()),
                ("X-EVA-Request-Signature-002".to_string(), "second".to_string()),
                ("X-EVA-Request-Signature-003".to_string(), "third".to_string()),
            ]
        );
    }

    #[test]
    fn header_count_matches_line_count() {
        for n in 0..12 {
            let lines: Vec<String> = (0..n).map(|i| format!("line-{i}")).collect();
            let sig = Signature(lines);
            assert_eq!(sig.headers().len(), n);
        }
    }

    #[tokio::test]
    async fn sign_captures_stdout_lines_in_order() {
        let signer = Signer::with_args("sh", &["-c", "cat > /dev/null; printf 'AAA\\nBBB\\n'"]);
        let sig = signer.sign("{}").await.unwrap();
        assert_eq!(sig.lines(), ["AAA".to_string(), "BBB".to_string()]);
    }

    #[tokio::test]
    async fn sign_receives_payload_on_stdin() {
        // echo the payload back as the signature
        let signer = Signer::with_args("sh", &["-c", "cat"]);
        let sig = signer.sign(r#"{"adapter":"x"}"#).await.unwrap();
        assert_eq!(sig.lines(), [r#"{"adapter":"x"}"#.to_string()]);
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_signing_failure_with_diagnostics() {
        let signer = Signer::with_args("sh", &["-c", "echo 'no secret key' >&2; exit 3"]);
        let err = signer.sign("{}").await.unwrap_err();
        match err {
            ControlError::SigningFailure { status, diagnostics } => {
                assert_eq!(status, 3);
                assert_eq!(diagnostics, vec!["no secret key".to_string()]);
            }
            other => panic!("expected SigningFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_signer_that_never_reads_stdin_is_still_a_signing_failure() {
        // the signer exits before touching stdin, so the payload write hits
        // a closed pipe; the exit status must still win over the write error
        let signer = Signer::with_args("sh", &["-c", "echo 'no secret key' >&2; exit 3"]);
        let payload = "x".repeat(1 << 20);
        let err = signer.sign(&payload).await.unwrap_err();
        match err {
            ControlError::SigningFailure { status, diagnostics } => {
                assert_eq!(status, 3);
                assert_eq!(diagnostics, vec!["no secret key".to_string()]);
            }
            other => panic!("expected SigningFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_an_io_error() {
        let signer = Signer::new("/nonexistent/eva-signer");
        let err = signer.sign("{}").await.unwrap_err();
        assert!(matches!(err, ControlError::SignerIo(_)));
    }
}
