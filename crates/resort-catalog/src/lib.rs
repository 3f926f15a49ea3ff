//! Static ski resort catalog used for client-side resort lookup.
//!
//! The catalog is a JSON array of resort rows published alongside the pass
//! picker front-ends. It is only ever used to help a rider pick a resort: the
//! scoring backends keep their own canonical resort set and nothing here is
//! validated against it.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Parsing catalog rows that spell their keys in several historical ways
//! - Display labels such as `Loon Mountain, N.H.`
//! - Typeahead suggestions for partially typed resort names
//! - Exact-match resolution of typed text back to a catalog entry
//! - Slugs for free-typed resorts that are not in the catalog
//!
//! # Example
//!
//! ```
//! use resort_catalog::ResortCatalog;
//!
//! let json = r#"[{"id": "loon", "name": "Loon Mountain", "state": "NH"}]"#;
//! let catalog = ResortCatalog::from_json(json).expect("valid catalog");
//!
//! let suggestions = catalog.search("loo");
//! assert_eq!(suggestions.len(), 1);
//! assert_eq!(suggestions[0].label(), "Loon Mountain, N.H.");
//! ```

mod catalog;
mod error;
mod normalize;
mod typeahead;

pub use catalog::{ResortCatalog, ResortCatalogEntry};
pub use error::CatalogError;
pub use normalize::{format_state, normalize_text, resort_slug};
pub use typeahead::{MAX_SUGGESTIONS, MIN_TYPEAHEAD_CHARS};
