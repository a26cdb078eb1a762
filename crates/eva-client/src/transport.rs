//! HTTP transport: URL construction, header assembly, and the call itself.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::ControlError;
use crate::payload::Payload;
use crate::response::ResponseOutcome;
use crate::signer::Signer;

/// Default request timeout in seconds when the operator does not override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP verbs accepted by the control API.
///
/// A closed enum rather than a free-form method string: any other verb is
/// unrepresentable, so the precondition holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Synchronous-in-spirit HTTP transport for control requests.
///
/// One transport per invocation; nothing is reused across runs. A network
/// or connection failure is [`ControlError::ConnectionFailure`] and always
/// fatal. A non-2xx status is *not* a transport failure: it is captured in
/// the [`ResponseOutcome`] and interpreted later.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base: reqwest::Url,
    signer: Signer,
}

impl HttpTransport {
    /// Build a transport against `base_url` with a request timeout policy.
    pub fn new(
        base_url: impl Into<String>,
        signer: Signer,
        timeout_secs: u64,
    ) -> Result<Self, ControlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into();
        let base = reqwest::Url::parse(&base_url)
            .map_err(|err| ControlError::InvalidServerUrl(format!("{base_url}: {err}")))?;

        Ok(Self {
            client,
            base,
            signer,
        })
    }

    /// Join the base server address with path segments.
    ///
    /// Each segment is percent-encoded, so an operator-supplied job id
    /// containing `/`, space, or `?` stays a single path segment.
    #[must_use]
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    /// Unsigned GET.
    pub async fn get(&self, url: &str) -> Result<ResponseOutcome, ControlError> {
        self.send(HttpMethod::Get, url, None, Vec::new()).await
    }

    /// Serialize and sign the payload, then send it.
    ///
    /// Signing happens strictly before any network I/O: if the external
    /// signer fails, no HTTP call is attempted.
    pub async fn send_signed(
        &self,
        method: HttpMethod,
        url: &str,
        payload: &Payload,
    ) -> Result<ResponseOutcome, ControlError> {
        let body = payload.serialize()?;
        let signature = self.signer.sign(&body).await?;
        self.send(method, url, Some(body), signature.headers()).await
    }

    /// Perform the HTTP call and capture the response descriptor.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
        headers: Vec<(String, String)>,
    ) -> Result<ResponseOutcome, ControlError> {
        debug!(%url, ?method, signed = !headers.is_empty(), "sending control request");

        let mut request = self.client.request(method.as_reqwest(), url);
        if body.is_some() {
            request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in &headers {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_connect() || err.is_timeout() {
                ControlError::ConnectionFailure(format!("cannot reach {url}: {err}"))
            } else {
                ControlError::Http(err)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ResponseOutcome { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_segments() {
        let transport = HttpTransport::new(
            "http://localhost:8080/",
            Signer::default(),
            DEFAULT_TIMEOUT_SECS,
        )
        .unwrap();
        assert_eq!(transport.url(&["health"]), "http://localhost:8080/health");
        assert_eq!(
            transport.url(&["control", "shutdown"]),
            "http://localhost:8080/control/shutdown"
        );
        assert_eq!(
            transport.url(&["jobs", "job-123"]),
            "http://localhost:8080/jobs/job-123"
        );
    }

    #[test]
    fn url_percent_encodes_raw_segments() {
        let transport = HttpTransport::new(
            "http://localhost:8080",
            Signer::default(),
            DEFAULT_TIMEOUT_SECS,
        )
        .unwrap();
        assert_eq!(
            transport.url(&["jobs", "job/1 ?x"]),
            "http://localhost:8080/jobs/job%2F1%20%3Fx"
        );
    }

    #[test]
    fn unparseable_server_address_is_rejected() {
        let err = HttpTransport::new("not a url", Signer::default(), DEFAULT_TIMEOUT_SECS)
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidServerUrl(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
