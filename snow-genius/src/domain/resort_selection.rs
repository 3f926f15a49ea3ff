//! Requested resorts and resolution of typed resort text.

use resort_catalog::{ResortCatalog, resort_slug};

/// A requested resort with ski days and date constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResortSelection {
    /// Backend resort identifier (catalog id or slug of the typed text).
    pub resort_id: String,
    /// Human-readable resort name.
    pub resort_name: String,
    /// Number of ski days requested; always at least one.
    pub days: u32,
    /// Only weekdays should be counted.
    pub no_weekends: bool,
    /// Blackout dates must be avoided.
    pub no_blackouts: bool,
}

impl ResortSelection {
    /// Whether passes with blackout dates are acceptable, the inverse of
    /// [`ResortSelection::no_blackouts`].
    pub const fn blackout_ok(&self) -> bool {
        !self.no_blackouts
    }
}

/// Outcome of resolving typed resort text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResort {
    /// Identifier sent to the backend.
    pub id: String,
    /// Display name sent alongside the identifier.
    pub name: String,
    /// Whether the identifier came from the catalog.
    pub in_catalog: bool,
}

/// Resolves typed resort text to a backend identifier.
///
/// Text naming a catalog entry (by name, label, or id) resolves to that
/// entry. Anything else resolves to its slug, which is looked up as an id once
/// more so `"Loon (NH)"` still finds `loon`. Resolving a resolved id again
/// yields the same id.
///
/// # Examples
///
/// ```
/// use resort_catalog::ResortCatalog;
/// use snow_genius::domain::resolve_resort;
///
/// let catalog = ResortCatalog::from_json(
///     r#"[{"id": "loon", "name": "Loon Mountain", "state": "NH"}]"#,
/// )
/// .expect("valid catalog");
///
/// assert_eq!(resolve_resort(&catalog, "Loon Mountain, N.H.").id, "loon");
/// assert_eq!(resolve_resort(&catalog, "Mount Snow, VT").id, "mountsnow");
/// ```
pub fn resolve_resort(catalog: &ResortCatalog, text: &str) -> ResolvedResort {
    let trimmed = text.trim();
    if let Some(entry) = catalog.find_exact(trimmed) {
        return ResolvedResort {
            id: entry.id().to_owned(),
            name: entry.name().to_owned(),
            in_catalog: true,
        };
    }

    let slug = resort_slug(trimmed);
    match catalog.find_by_id(&slug) {
        Some(entry) => ResolvedResort {
            id: entry.id().to_owned(),
            name: entry.name().to_owned(),
            in_catalog: true,
        },
        None => ResolvedResort {
            id: slug,
            name: trimmed.to_owned(),
            in_catalog: false,
        },
    }
}
