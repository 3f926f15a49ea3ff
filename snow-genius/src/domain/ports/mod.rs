//! Domain ports and supporting types for the outbound boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod scoring_service;

#[cfg(test)]
pub use scoring_service::MockScoringService;
pub use scoring_service::{FixtureScoringService, ScoringService, ScoringServiceError};
