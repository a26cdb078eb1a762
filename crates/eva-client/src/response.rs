//! Interpretation of HTTP outcomes into log lines and exit codes.

use serde_json::Value;
use tracing::{error, info};

/// Status code and body captured from an HTTP control request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutcome {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ResponseOutcome {
    /// True for any status in `[200, 300)`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human-readable message for the operator.
    ///
    /// Precedence over a non-empty JSON object body: `title`, else
    /// `message`, else `error`, else the raw response text. Non-JSON and
    /// empty bodies fall through to the raw text.
    #[must_use]
    pub fn message(&self) -> String {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&self.body) {
            for key in ["title", "message", "error"] {
                if let Some(Value::String(text)) = map.get(key) {
                    return text.clone();
                }
            }
        }
        self.body.clone()
    }

    /// Log the server's answer and translate it to a process exit code:
    /// 2xx logs at info and exits 0, anything else logs at error and
    /// exits 1.
    pub fn interpret(&self) -> i32 {
        let message = self.message();
        if self.is_success() {
            info!("Response from server: {} {}", self.status, message);
            0
        } else {
            error!("Response from server: {} {}", self.status, message);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: u16, body: &str) -> ResponseOutcome {
        ResponseOutcome {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn title_takes_precedence_over_message() {
        let o = outcome(200, r#"{"title":"A","message":"B"}"#);
        assert_eq!(o.message(), "A");
    }

    #[test]
    fn message_used_when_no_title() {
        let o = outcome(200, r#"{"message":"B"}"#);
        assert_eq!(o.message(), "B");
    }

    #[test]
    fn error_used_when_no_title_or_message() {
        let o = outcome(500, r#"{"error":"broken pipe"}"#);
        assert_eq!(o.message(), "broken pipe");
    }

    #[test]
    fn raw_text_for_non_json_body() {
        let o = outcome(502, "Bad Gateway");
        assert_eq!(o.message(), "Bad Gateway");
    }

    #[test]
    fn empty_body_yields_empty_message() {
        let o = outcome(204, "");
        assert_eq!(o.message(), "");
    }

    #[test]
    fn exit_code_boundaries() {
        assert_eq!(outcome(199, "").interpret(), 1);
        assert_eq!(outcome(200, "").interpret(), 0);
        assert_eq!(outcome(299, "").interpret(), 0);
        assert_eq!(outcome(300, "").interpret(), 1);
    }

    #[test]
    fn not_found_is_an_application_error() {
        assert_eq!(outcome(404, r#"{"title":"no such job"}"#).interpret(), 1);
    }
}
