//! Reqwest-backed scoring service adapter.
//!
//! This adapter owns transport details only: JSON request serialisation,
//! timeout and HTTP error mapping, and JSON decoding of the response body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::ports::{ScoringService, ScoringServiceError};
use crate::domain::{ScoringPayload, ScoringResponse, is_truthy};

/// Client timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const DEFAULT_USER_AGENT: &str = "snow-genius-cli/0.1";

/// Scoring adapter that POSTs JSON payloads to one endpoint.
#[derive(Debug, Clone)]
pub struct ScoringHttpSource {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl ScoringHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = ScoringHttpSource::new(endpoint, DEFAULT_TIMEOUT);
    /// assert!(source.is_ok() || source.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(endpoint, timeout, DEFAULT_USER_AGENT)
    }

    /// Build an adapter with an explicit user agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(
        endpoint: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            user_agent: user_agent.into(),
        })
    }

    /// Endpoint every payload is sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScoringService for ScoringHttpSource {
    async fn score(
        &self,
        payload: &ScoringPayload,
    ) -> Result<ScoringResponse, ScoringServiceError> {
        debug!(endpoint = %self.endpoint, mode = %payload.mode(), "posting scoring payload");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        info!(
            endpoint = %self.endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            "scoring service responded"
        );
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_body(body.as_ref()).map(ScoringResponse::from_value)
    }
}

fn parse_body(body: &[u8]) -> Result<Value, ScoringServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|error| {
        ScoringServiceError::decode(format!("invalid scoring JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> ScoringServiceError {
    if error.is_timeout() {
        ScoringServiceError::timeout(error.to_string())
    } else {
        ScoringServiceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ScoringServiceError {
    let detail =
        error_detail(body).unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ScoringServiceError::timeout(format!("status {}: {detail}", status.as_u16()))
        }
        _ => ScoringServiceError::rejected(status.as_u16(), detail),
    }
}

/// Reads `detail`, then `error`, from a JSON error body. Falsy values such
/// as `""`, `false`, and `0` count as absent.
fn error_detail(body: &[u8]) -> Option<String> {
    let Value::Object(fields) = serde_json::from_slice::<Value>(body).ok()? else {
        return None;
    };
    ["detail", "error"]
        .into_iter()
        .filter_map(|key| fields.get(key))
        .find(|value| is_truthy(value))
        .map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::detail_string(
        br#"{"detail": "days must be positive"}"#.as_slice(),
        "days must be positive"
    )]
    #[case::detail_list(
        br#"{"detail": [{"loc": ["body", "riders"], "msg": "field required"}]}"#.as_slice(),
        r#"[{"loc":["body","riders"],"msg":"field required"}]"#
    )]
    #[case::error_field(br#"{"error": "unknown resort"}"#.as_slice(), "unknown resort")]
    #[case::detail_wins(br#"{"error": "b", "detail": "a"}"#.as_slice(), "a")]
    #[case::empty_detail_falls_through(
        br#"{"detail": "", "error": "unknown resort"}"#.as_slice(),
        "unknown resort"
    )]
    #[case::falsy_fields(br#"{"detail": false, "error": 0}"#.as_slice(), "Request failed (422)")]
    #[case::plain_text(b"Internal   Server\nError".as_slice(), "Request failed (422)")]
    #[case::empty(b"".as_slice(), "Request failed (422)")]
    #[case::json_without_detail(br#"{"message": "nope"}"#.as_slice(), "Request failed (422)")]
    fn rejection_detail_prefers_detail_then_error(#[case] body: &[u8], #[case] expected: &str) {
        let error = map_status_error(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(error, ScoringServiceError::rejected(422_u16, expected));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");
        assert!(
            matches!(error, ScoringServiceError::Timeout { .. }),
            "timeout statuses should map to Timeout",
        );
    }

    #[test]
    fn server_errors_without_detail_report_the_status() {
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message": "nope"}"#);
        assert_eq!(
            error,
            ScoringServiceError::rejected(500_u16, "Request failed (500)")
        );
    }

    #[rstest]
    #[case::empty(b"".as_slice(), json!({}))]
    #[case::whitespace(b" \n".as_slice(), json!({}))]
    #[case::object(br#"{"results": []}"#.as_slice(), json!({"results": []}))]
    fn parses_success_bodies(#[case] body: &[u8], #[case] expected: Value) {
        assert_eq!(parse_body(body).expect("decodes"), expected);
    }

    #[test]
    fn invalid_success_body_is_a_decode_error() {
        let error = parse_body(b"<html>").expect_err("not JSON");
        assert!(matches!(error, ScoringServiceError::Decode { .. }));
    }
}
