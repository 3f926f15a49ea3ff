//! Riders and their discount categories.
//!
//! Front-ends have spelled the discount vocabulary many ways over time
//! (`nurse`, `Nurse`, `medical`, `Nurse/Doc`, `mil`, `n/a`, ...). Everything is
//! folded into [`RiderCategory`] at the edge; each backend then receives the
//! spelling it expects from the payload builder.

use std::fmt;

use resort_catalog::normalize_text;
use serde::{Deserialize, Serialize};
use tracing::warn;

const NONE_ALIASES: &[&str] = &["", "none", "no", "n/a", "na"];
const MEDICAL_KEYWORDS: &[&str] = &["nurse", "doc", "medical"];

/// Discount category a rider may qualify for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiderCategory {
    /// No discount.
    #[default]
    None,
    /// Active duty or veteran military.
    Military,
    /// Student.
    Student,
    /// Nurses, doctors, and other medical staff.
    Medical,
}

impl RiderCategory {
    /// Folds free-form category text into a canonical category.
    ///
    /// The mapping is total: unrecognised text becomes [`RiderCategory::None`]
    /// and is logged. It is also idempotent, since
    /// `canonicalize(c.as_str()) == c` for every category.
    ///
    /// # Examples
    ///
    /// ```
    /// use snow_genius::domain::RiderCategory;
    ///
    /// assert_eq!(RiderCategory::canonicalize("Nurse/Doc"), RiderCategory::Medical);
    /// assert_eq!(RiderCategory::canonicalize(" Veteran "), RiderCategory::Military);
    /// assert_eq!(RiderCategory::canonicalize("n/a"), RiderCategory::None);
    /// ```
    pub fn canonicalize(value: &str) -> Self {
        let raw = normalize_text(value);
        if NONE_ALIASES.contains(&raw.as_str()) {
            return Self::None;
        }
        if raw == "mil" || raw.contains("military") || raw.contains("veteran") {
            return Self::Military;
        }
        if raw.contains("student") {
            return Self::Student;
        }
        if MEDICAL_KEYWORDS.iter().any(|keyword| raw.contains(keyword)) {
            return Self::Medical;
        }
        warn!(category = %raw, "unrecognised rider category; treating as none");
        Self::None
    }

    /// Canonical lowercase spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Military => "military",
            Self::Student => "student",
            Self::Medical => "medical",
        }
    }

    /// Spelling expected by the single-pass and multi-pass services.
    pub const fn legacy_label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Military => "Military",
            Self::Student => "Student",
            Self::Medical => "Nurse",
        }
    }

    /// Spelling expected by the auto service, where no discount is `null`.
    pub const fn discount_label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for RiderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person a pass is being priced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rider {
    /// Age in whole years.
    pub age: u32,
    /// Discount category.
    pub category: RiderCategory,
}

impl Rider {
    /// Builds a rider.
    pub const fn new(age: u32, category: RiderCategory) -> Self {
        Self { age, category }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", RiderCategory::None)]
    #[case("None", RiderCategory::None)]
    #[case("N/A", RiderCategory::None)]
    #[case("na", RiderCategory::None)]
    #[case("no", RiderCategory::None)]
    #[case("mil", RiderCategory::Military)]
    #[case("Military", RiderCategory::Military)]
    #[case("retired veteran", RiderCategory::Military)]
    #[case("STUDENT", RiderCategory::Student)]
    #[case("college student", RiderCategory::Student)]
    #[case("nurse", RiderCategory::Medical)]
    #[case("Nurse", RiderCategory::Medical)]
    #[case("medical", RiderCategory::Medical)]
    #[case("Nurse/Doc", RiderCategory::Medical)]
    #[case("doctor", RiderCategory::Medical)]
    #[case("senior", RiderCategory::None)]
    fn canonicalises_ui_values(#[case] input: &str, #[case] expected: RiderCategory) {
        assert_eq!(RiderCategory::canonicalize(input), expected);
    }

    #[rstest]
    #[case(RiderCategory::None)]
    #[case(RiderCategory::Military)]
    #[case(RiderCategory::Student)]
    #[case(RiderCategory::Medical)]
    fn canonicalisation_is_idempotent(#[case] category: RiderCategory) {
        assert_eq!(RiderCategory::canonicalize(category.as_str()), category);
        assert_eq!(
            RiderCategory::canonicalize(category.legacy_label()),
            category
        );
    }

    #[rstest]
    #[case(RiderCategory::None, None)]
    #[case(RiderCategory::Medical, Some("medical"))]
    fn discount_label_uses_null_for_no_discount(
        #[case] category: RiderCategory,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(category.discount_label(), expected);
    }
}
