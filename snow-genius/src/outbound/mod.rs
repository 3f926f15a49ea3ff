//! Outbound adapters implementing domain ports and loading static data.
//!
//! - **scoring**: reqwest-backed implementation of the scoring port
//! - **catalog**: resort catalog loading from disk or over HTTP
//!
//! Adapters translate between domain types and the wire. They contain no
//! business logic.

pub mod catalog;
pub mod scoring;
