//! Text normalisation shared by catalog indexing, search, and slugs.

/// Trims, lowercases, and collapses internal whitespace to single spaces.
///
/// # Example
///
/// ```
/// use resort_catalog::normalize_text;
///
/// assert_eq!(normalize_text("  Sunday   River "), "sunday river");
/// ```
#[must_use]
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Formats a two-letter state code as `N.H.`; other values are only trimmed.
///
/// # Example
///
/// ```
/// use resort_catalog::format_state;
///
/// assert_eq!(format_state("nh"), "N.H.");
/// assert_eq!(format_state(" Quebec "), "Quebec");
/// ```
#[must_use]
pub fn format_state(state: &str) -> String {
    let raw = state.trim();
    let mut chars = raw.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), Some(second), None)
            if first.is_ascii_alphabetic() && second.is_ascii_alphabetic() =>
        {
            format!(
                "{}.{}.",
                first.to_ascii_uppercase(),
                second.to_ascii_uppercase()
            )
        }
        _ => raw.to_owned(),
    }
}

/// Derives the backend slug for a free-typed resort name.
///
/// Parenthesised annotations are dropped, everything after the first comma
/// (usually a state or country) is ignored, and only ASCII alphanumerics are
/// kept. Applying the function to its own output returns the same value.
///
/// # Example
///
/// ```
/// use resort_catalog::resort_slug;
///
/// assert_eq!(resort_slug("Sunday River, ME"), "sundayriver");
/// assert_eq!(resort_slug("Mont-Tremblant (Ikon), QC"), "monttremblant");
/// ```
#[must_use]
pub fn resort_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = strip_parenthesised(&lowered);
    let head = stripped.split(',').next().unwrap_or_default();
    head.chars().filter(char::is_ascii_alphanumeric).collect()
}

fn strip_parenthesised(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some((before, after_open)) = rest.split_once('(') {
        let Some((_, after_close)) = after_open.split_once(')') else {
            break;
        };
        out.push_str(before);
        rest = after_close;
    }
    out.push_str(rest);
    out
}

/// Splits `"Loon Mountain, N.H."` into `"Loon Mountain"` when the text after
/// the last comma looks like a state or country suffix.
pub(crate) fn strip_state_suffix(text: &str) -> Option<&str> {
    let (head, tail) = text.rsplit_once(',')?;
    let suffix = tail.trim();
    let looks_like_state = !suffix.is_empty()
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '.' || c == ' ');
    looks_like_state.then_some(head)
}
