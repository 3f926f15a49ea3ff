//! Typeahead matching over catalog entries.

use crate::catalog::ResortCatalogEntry;
use crate::normalize::normalize_text;

/// Minimum normalised query length before suggestions are offered.
pub const MIN_TYPEAHEAD_CHARS: usize = 3;

/// Maximum number of suggestions returned for one query.
pub const MAX_SUGGESTIONS: usize = 10;

pub(crate) fn suggest<'a>(
    entries: &'a [ResortCatalogEntry],
    query: &str,
) -> Vec<&'a ResortCatalogEntry> {
    let normalized = normalize_text(query);
    if normalized.chars().count() < MIN_TYPEAHEAD_CHARS {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| entry.search_text().contains(normalized.as_str()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn entries() -> Vec<ResortCatalogEntry> {
        vec![
            ResortCatalogEntry::new("cannon", "Cannon", "NH"),
            ResortCatalogEntry::new("killington", "Killington", "VT"),
            ResortCatalogEntry::new("loon", "Loon Mountain", "NH"),
            ResortCatalogEntry::new("sugarloaf", "Sugarloaf", "ME"),
        ]
    }

    #[rstest]
    #[case("lo")]
    #[case("  lo  ")]
    #[case("")]
    fn short_queries_have_no_suggestions(entries: Vec<ResortCatalogEntry>, #[case] query: &str) {
        assert!(suggest(&entries, query).is_empty());
    }

    #[rstest]
    #[case("loo", vec!["loon"])]
    #[case("LOAF", vec!["sugarloaf"])]
    #[case("n.h.", vec!["cannon", "loon"])]
    #[case("killington", vec!["killington"])]
    #[case("zermatt", vec![])]
    fn matches_name_label_and_id(
        entries: Vec<ResortCatalogEntry>,
        #[case] query: &str,
        #[case] expected: Vec<&str>,
    ) {
        let ids = suggest(&entries, query)
            .into_iter()
            .map(ResortCatalogEntry::id)
            .collect::<Vec<_>>();
        assert_eq!(ids, expected);
    }

    #[test]
    fn caps_suggestions() {
        let many = (0..25)
            .map(|n| ResortCatalogEntry::new(format!("peak{n:02}"), format!("Peak {n:02}"), ""))
            .collect::<Vec<_>>();

        let suggestions = suggest(&many, "peak");
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions.first().map(|e| e.id()), Some("peak00"));
    }
}
