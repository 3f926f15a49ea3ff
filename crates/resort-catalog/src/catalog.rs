//! Resort catalog types and JSON parsing.
//!
//! Catalog files have been published with several key spellings over time
//! (`resort_id` vs `id`, `resort_name` vs `name`, ...). Parsing accepts all of
//! them and keeps only rows that carry both an identifier and a name.

use std::collections::HashMap;
use std::io::Read;

use camino::Utf8Path;
use cap_std::fs::Dir;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CatalogError;
use crate::normalize::{format_state, normalize_text, strip_state_suffix};
use crate::typeahead;

const ID_KEYS: &[&str] = &["resort_id", "id", "ResortID", "ResortId", "slug"];
const NAME_KEYS: &[&str] = &["resort_name", "name", "ResortName", "title"];
const STATE_KEYS: &[&str] = &["state", "State"];

/// One resort from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResortCatalogEntry {
    id: String,
    name: String,
    state: String,
    label: String,
    search_text: String,
}

impl ResortCatalogEntry {
    /// Builds an entry, trimming every field and deriving the display label.
    ///
    /// # Example
    ///
    /// ```
    /// use resort_catalog::ResortCatalogEntry;
    ///
    /// let entry = ResortCatalogEntry::new("loon", "Loon Mountain", "NH");
    /// assert_eq!(entry.label(), "Loon Mountain, N.H.");
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, state: impl Into<String>) -> Self {
        let id = id.into().trim().to_owned();
        let name = name.into().trim().to_owned();
        let state = state.into().trim().to_owned();
        let formatted_state = format_state(&state);
        let label = if formatted_state.is_empty() {
            name.clone()
        } else {
            format!("{name}, {formatted_state}")
        };
        let search_text = normalize_text(&format!("{name} {label} {id}"));
        Self {
            id,
            name,
            state,
            label,
            search_text,
        }
    }

    /// Returns the catalog identifier (usually the backend slug).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resort display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw state or region value.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the label shown in suggestion lists.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn search_text(&self) -> &str {
        &self.search_text
    }
}

/// An indexed, name-sorted resort catalog.
///
/// # Example
///
/// ```
/// use resort_catalog::ResortCatalog;
///
/// let json = r#"[
///     {"resort_id": "stratton", "resort_name": "Stratton", "state": "VT"},
///     {"id": "loon", "name": "Loon Mountain", "state": "NH"}
/// ]"#;
///
/// let catalog = ResortCatalog::from_json(json).expect("valid catalog");
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.entries()[0].id(), "loon");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResortCatalog {
    entries: Vec<ResortCatalogEntry>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl ResortCatalog {
    /// Parses a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the JSON is malformed, is not an array, or
    /// contains no row with both an identifier and a name.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::from_slice(json.as_bytes())
    }

    /// Parses a catalog from raw JSON bytes, such as an HTTP response body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] under the same conditions as
    /// [`ResortCatalog::from_json`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| CatalogError::ParseError {
                message: e.to_string(),
            })?;
        let Value::Array(rows) = value else {
            return Err(CatalogError::NotAnArray);
        };

        let entries = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| parse_row(index, row))
            .collect::<Vec<_>>();
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self::from_entries(entries))
    }

    /// Loads a catalog from a file relative to a capability-scoped directory.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_file(dir: &Dir, path: &Utf8Path) -> Result<Self, CatalogError> {
        let io_error = |e: std::io::Error| CatalogError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let mut file = dir.open(path).map_err(io_error)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_error)?;

        Self::from_slice(&contents)
    }

    /// Builds an indexed catalog from already constructed entries.
    ///
    /// Entries are sorted case-insensitively by name. When two entries share
    /// an identifier or a name, the later one wins lookups.
    #[must_use]
    pub fn from_entries(mut entries: Vec<ResortCatalogEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut by_name = HashMap::with_capacity(entries.len() * 2);
        let mut by_id = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            by_id.insert(normalize_text(&entry.id), index);
            by_name.insert(normalize_text(&entry.name), index);
            by_name.insert(normalize_text(&entry.label), index);
        }

        Self {
            entries,
            by_name,
            by_id,
        }
    }

    /// Returns all entries in name order.
    #[must_use]
    pub fn entries(&self) -> &[ResortCatalogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the catalog holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns typeahead suggestions for partially typed text.
    ///
    /// Queries shorter than [`crate::MIN_TYPEAHEAD_CHARS`] characters after
    /// normalisation yield no suggestions; at most
    /// [`crate::MAX_SUGGESTIONS`] entries are returned in catalog order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ResortCatalogEntry> {
        typeahead::suggest(&self.entries, query)
    }

    /// Finds the entry with the given identifier, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&ResortCatalogEntry> {
        self.by_id
            .get(&normalize_text(id))
            .and_then(|index| self.entries.get(*index))
    }

    /// Resolves fully typed text to a catalog entry.
    ///
    /// The text matches when it equals an entry's name or label (after
    /// normalisation), when it equals a name once a trailing `", ST"` suffix
    /// is dropped, or when it equals an identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use resort_catalog::ResortCatalog;
    ///
    /// let catalog = ResortCatalog::from_json(
    ///     r#"[{"id": "loon", "name": "Loon Mountain", "state": "NH"}]"#,
    /// )
    /// .expect("valid catalog");
    ///
    /// assert!(catalog.find_exact("loon mountain, nh").is_some());
    /// assert!(catalog.find_exact("Loon Mountain, N.H.").is_some());
    /// assert!(catalog.find_exact("Loon Mtn").is_none());
    /// ```
    #[must_use]
    pub fn find_exact(&self, text: &str) -> Option<&ResortCatalogEntry> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return None;
        }
        self.lookup_name(&normalized)
            .or_else(|| {
                strip_state_suffix(text).and_then(|head| self.lookup_name(&normalize_text(head)))
            })
            .or_else(|| self.find_by_id(&normalized))
    }

    fn lookup_name(&self, normalized: &str) -> Option<&ResortCatalogEntry> {
        self.by_name
            .get(normalized)
            .and_then(|index| self.entries.get(*index))
    }
}

fn parse_row(index: usize, row: &Value) -> Option<ResortCatalogEntry> {
    let Value::Object(fields) = row else {
        debug!(index, "skipping non-object resort catalog row");
        return None;
    };
    let (Some(id), Some(name)) = (pick_field(fields, ID_KEYS), pick_field(fields, NAME_KEYS))
    else {
        debug!(index, "skipping resort catalog row without id or name");
        return None;
    };
    let state = pick_field(fields, STATE_KEYS).unwrap_or_default();
    Some(ResortCatalogEntry::new(id, name, state))
}

fn pick_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(value_text)
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_owned(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const MIXED_JSON: &str = r#"[
        {"resort_id": "sunday_river", "resort_name": "Sunday River", "state": "ME"},
        {"id": "loon", "name": "Loon Mountain", "state": "NH"},
        {"ResortID": 42, "ResortName": "Bretton Woods", "State": "nh"},
        {"slug": "whistler", "title": "Whistler Blackcomb", "state": "British Columbia"},
        {"id": "", "name": "Missing Id"},
        {"id": "nameless"},
        "not-an-object"
    ]"#;

    #[test]
    fn parses_rows_with_any_key_spelling() {
        let catalog = ResortCatalog::from_json(MIXED_JSON).expect("valid catalog");

        let ids = catalog
            .entries()
            .iter()
            .map(ResortCatalogEntry::id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["42", "loon", "sunday_river", "whistler"]);
    }

    #[test]
    fn derives_labels_from_state() {
        let catalog = ResortCatalog::from_json(MIXED_JSON).expect("valid catalog");

        let bretton = catalog.find_by_id("42").expect("entry by numeric id");
        assert_eq!(bretton.label(), "Bretton Woods, N.H.");
        let whistler = catalog.find_by_id("whistler").expect("entry by slug");
        assert_eq!(whistler.label(), "Whistler Blackcomb, British Columbia");
    }

    #[rstest]
    #[case::malformed("not json")]
    #[case::truncated("[{\"id\": \"loon\"")]
    fn rejects_malformed_json(#[case] json: &str) {
        let result = ResortCatalog::from_json(json);
        assert!(matches!(result, Err(CatalogError::ParseError { .. })));
    }

    #[rstest]
    #[case::object(r#"{"resorts": []}"#, CatalogError::NotAnArray)]
    #[case::empty_array("[]", CatalogError::Empty)]
    #[case::unusable_rows(r#"[{"id": "x"}, {"name": "y"}]"#, CatalogError::Empty)]
    fn rejects_unusable_catalogs(#[case] json: &str, #[case] expected: CatalogError) {
        assert_eq!(ResortCatalog::from_json(json), Err(expected));
    }

    #[rstest]
    #[case("Sunday River", "sunday_river")]
    #[case("sunday river, me", "sunday_river")]
    #[case("Sunday River, M.E.", "sunday_river")]
    #[case("Sunday River, Maine", "sunday_river")]
    #[case("SUNDAY_RIVER", "sunday_river")]
    #[case("  loon   mountain ", "loon")]
    fn finds_exact_matches(#[case] text: &str, #[case] expected_id: &str) {
        let catalog = ResortCatalog::from_json(MIXED_JSON).expect("valid catalog");

        let entry = catalog.find_exact(text).expect("exact match");
        assert_eq!(entry.id(), expected_id);
    }

    #[rstest]
    #[case("")]
    #[case("Sunday")]
    #[case("Loon Mountain Resort")]
    fn rejects_partial_matches(#[case] text: &str) {
        let catalog = ResortCatalog::from_json(MIXED_JSON).expect("valid catalog");

        assert!(catalog.find_exact(text).is_none());
    }

    #[test]
    fn later_duplicate_ids_win_lookups() {
        let catalog = ResortCatalog::from_entries(vec![
            ResortCatalogEntry::new("cannon", "Cannon", "NH"),
            ResortCatalogEntry::new("cannon", "Cannon Mountain", "NH"),
        ]);

        let entry = catalog.find_by_id("cannon").expect("entry");
        assert_eq!(entry.name(), "Cannon Mountain");
    }

    #[test]
    fn default_catalog_is_empty() {
        let catalog = ResortCatalog::default();

        assert!(catalog.is_empty());
        assert!(catalog.search("loon").is_empty());
        assert!(catalog.find_exact("loon").is_none());
    }
}
