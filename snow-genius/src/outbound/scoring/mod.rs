//! Scoring service outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `ScoringService`
//! port.

mod http_source;

pub use http_source::{DEFAULT_TIMEOUT, ScoringHttpSource};
