//! Driven port for the external pass scoring services.
//!
//! The domain owns the payload and response shapes; adapters only move them
//! across the wire. One adapter instance talks to one endpoint, so the
//! payload's mode must match the endpoint the adapter was built for.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;
use crate::domain::{ScoringPayload, ScoringResponse};

define_port_error! {
    /// Errors surfaced while calling a scoring service.
    pub enum ScoringServiceError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "scoring transport failed: {message}",
        /// The request exceeded the client timeout, or the service reported
        /// a timeout status.
        Timeout { message: String } =>
            "scoring request timed out: {message}",
        /// The service answered with a non-success status.
        Rejected { status: u16, detail: String } =>
            "scoring service rejected the request ({status}): {detail}",
        /// A success response could not be decoded as JSON.
        Decode { message: String } =>
            "scoring response decode failed: {message}",
    }
}

/// Port for submitting one payload to a scoring service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Submit one payload and return the interpreted response.
    ///
    /// Implementations perform exactly one request: no retry, no backoff.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use snow_genius::domain::ports::{FixtureScoringService, ScoringService};
    ///
    /// let response = FixtureScoringService.score(&payload).await?;
    /// assert!(response.raw().is_object());
    /// # Ok::<(), snow_genius::domain::ports::ScoringServiceError>(())
    /// ```
    async fn score(
        &self,
        payload: &ScoringPayload,
    ) -> Result<ScoringResponse, ScoringServiceError>;
}

/// Fixture implementation answering every payload with an empty result set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureScoringService;

#[async_trait]
impl ScoringService for FixtureScoringService {
    async fn score(
        &self,
        _payload: &ScoringPayload,
    ) -> Result<ScoringResponse, ScoringServiceError> {
        let mut body = Map::new();
        body.insert("results".to_owned(), Value::Array(Vec::new()));
        Ok(ScoringResponse::from_value(Value::Object(body)))
    }
}
