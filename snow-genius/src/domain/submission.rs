//! Submission service: validate, build, send once.

use std::sync::Arc;

use resort_catalog::ResortCatalog;
use thiserror::Error;
use tracing::{info, warn};

use super::form::{FormErrors, FormState};
use super::payload::{ScoringMode, ScoringPayload, build_payload};
use super::ports::{ScoringService, ScoringServiceError};
use super::recommendation::ScoringResponse;

/// Errors returned by [`SubmissionService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The form did not validate; nothing was sent.
    #[error("{0}")]
    Invalid(#[from] FormErrors),
    /// The scoring service call failed.
    #[error(transparent)]
    Scoring(#[from] ScoringServiceError),
}

/// A sent payload together with the response it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Payload exactly as sent.
    pub payload: ScoringPayload,
    /// Interpreted response.
    pub response: ScoringResponse,
}

/// Domain service driving one scoring backend.
#[derive(Clone)]
pub struct SubmissionService<S: ?Sized> {
    scoring: Arc<S>,
    mode: ScoringMode,
}

impl<S: ?Sized> SubmissionService<S> {
    /// Create a service submitting `mode` payloads through `scoring`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use resort_catalog::ResortCatalog;
    /// # use snow_genius::domain::ports::FixtureScoringService;
    /// # use snow_genius::domain::{FormState, ScoringMode, SubmissionService};
    /// # async fn example() -> Result<(), snow_genius::domain::SubmissionError> {
    /// let service = SubmissionService::new(Arc::new(FixtureScoringService), ScoringMode::Multi);
    /// let submission = service
    ///     .submit(&FormState::new(), &ResortCatalog::default())
    ///     .await?;
    /// # let _ = submission;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(scoring: Arc<S>, mode: ScoringMode) -> Self {
        Self { scoring, mode }
    }

    /// Mode this service submits.
    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    /// Validate the form and build the payload without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Invalid`] when the form does not validate.
    pub fn prepare(
        &self,
        form: &FormState,
        catalog: &ResortCatalog,
    ) -> Result<ScoringPayload, SubmissionError> {
        let validated = form.validate(catalog).inspect_err(|errors| {
            warn!(
                mode = %self.mode,
                problems = errors.errors().len(),
                "form failed validation"
            );
        })?;
        Ok(build_payload(self.mode, &validated))
    }
}

impl<S> SubmissionService<S>
where
    S: ScoringService + ?Sized,
{
    /// Validate, build, and send the payload exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Invalid`] without any network call when the
    /// form does not validate, or [`SubmissionError::Scoring`] when the call
    /// fails.
    pub async fn submit(
        &self,
        form: &FormState,
        catalog: &ResortCatalog,
    ) -> Result<Submission, SubmissionError> {
        let payload = self.prepare(form, catalog)?;
        self.send(payload).await
    }

    /// Send an already prepared payload exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Scoring`] when the call fails.
    pub async fn send(&self, payload: ScoringPayload) -> Result<Submission, SubmissionError> {
        info!(mode = %self.mode, "submitting scoring request");
        let response = self.scoring.score(&payload).await?;
        Ok(Submission { payload, response })
    }
}
