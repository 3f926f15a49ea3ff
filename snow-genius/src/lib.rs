//! Snow Genius ski pass client library.
//!
//! Maps rider and resort form rows onto the payloads the hosted scoring
//! services expect, sends them, and renders the recommendations that come
//! back.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
