//! Form state for riders and resorts, and its validation.
//!
//! Rows hold raw text exactly as a user typed it. Validation turns the rows
//! into typed [`Rider`] and [`ResortSelection`] values or reports every
//! problem at once, in row order.

use resort_catalog::ResortCatalog;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::resort_selection::{ResortSelection, resolve_resort};
use super::rider::{Rider, RiderCategory};

/// One rider row as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderRow {
    /// Age text.
    #[serde(deserialize_with = "text_or_number")]
    pub age: String,
    /// Category text, canonicalised during validation.
    #[serde(deserialize_with = "text_or_number")]
    pub category: String,
}

impl RiderRow {
    /// Builds a row from typed text.
    pub fn new(age: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            age: age.into(),
            category: category.into(),
        }
    }
}

/// One resort row as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResortRow {
    /// Resort text: a catalog label, name, id, or free text.
    #[serde(deserialize_with = "text_or_number")]
    pub resort: String,
    /// Ski days text.
    #[serde(deserialize_with = "text_or_number")]
    pub days: String,
    /// Weekdays only.
    pub no_weekends: bool,
    /// Avoid blackout dates.
    pub no_blackouts: bool,
}

impl ResortRow {
    /// Builds a row from typed text with both date constraints off.
    pub fn new(resort: impl Into<String>, days: impl Into<String>) -> Self {
        Self {
            resort: resort.into(),
            days: days.into(),
            no_weekends: false,
            no_blackouts: false,
        }
    }

    /// Sets the weekday-only constraint.
    #[must_use]
    pub const fn with_no_weekends(mut self, no_weekends: bool) -> Self {
        self.no_weekends = no_weekends;
        self
    }

    /// Sets the blackout constraint.
    #[must_use]
    pub const fn with_no_blackouts(mut self, no_blackouts: bool) -> Self {
        self.no_blackouts = no_blackouts;
        self
    }

    fn is_blank(&self) -> bool {
        self.resort.trim().is_empty() && self.days.trim().is_empty()
    }
}

/// Ordered rider and resort rows.
///
/// A fresh form holds one blank row of each kind, and removing the last row
/// of a kind resets it to blank instead.
///
/// # Examples
///
/// ```
/// use snow_genius::domain::{FormState, ResortRow, RiderRow};
///
/// let mut form = FormState::new();
/// form.riders[0] = RiderRow::new("35", "none");
/// form.resorts[0] = ResortRow::new("Loon Mountain", "3");
/// form.add_rider();
/// assert_eq!(form.riders.len(), 2);
///
/// form.reset();
/// assert_eq!(form, FormState::new());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    /// Rider rows in display order.
    pub riders: Vec<RiderRow>,
    /// Resort rows in display order.
    pub resorts: Vec<ResortRow>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Returns a form with one blank rider row and one blank resort row.
    pub fn new() -> Self {
        Self {
            riders: vec![RiderRow::default()],
            resorts: vec![ResortRow::default()],
        }
    }

    /// Builds a form from existing rows, keeping them as given.
    pub fn from_rows(riders: Vec<RiderRow>, resorts: Vec<ResortRow>) -> Self {
        Self { riders, resorts }
    }

    /// Appends a blank rider row.
    pub fn add_rider(&mut self) {
        self.riders.push(RiderRow::default());
    }

    /// Appends a blank resort row.
    pub fn add_resort(&mut self) {
        self.resorts.push(ResortRow::default());
    }

    /// Removes the rider row at `index`.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn remove_rider(&mut self, index: usize) -> bool {
        remove_row(&mut self.riders, index)
    }

    /// Removes the resort row at `index`.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn remove_resort(&mut self, index: usize) -> bool {
        remove_row(&mut self.resorts, index)
    }

    /// Clears every row back to a fresh form.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Validates every row against the catalog.
    ///
    /// Resort rows with neither resort text nor days are skipped. Row numbers
    /// in messages are one-based positions in the form.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] listing every problem found, in row order.
    pub fn validate(&self, catalog: &ResortCatalog) -> Result<ValidatedForm, FormErrors> {
        let mut errors = Vec::new();

        let mut riders = Vec::with_capacity(self.riders.len());
        for (index, row) in self.riders.iter().enumerate() {
            let row_number = index + 1;
            match parse_whole(&row.age) {
                Some(age) => riders.push(Rider::new(
                    age,
                    RiderCategory::canonicalize(&row.category),
                )),
                None => errors.push(FormError::InvalidAge { row: row_number }),
            }
        }

        let mut resorts = Vec::with_capacity(self.resorts.len());
        let mut resort_rows_seen = 0_usize;
        for (index, row) in self.resorts.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            resort_rows_seen += 1;
            let row_number = index + 1;

            let resort_text = row.resort.trim();
            let resolved = if resort_text.is_empty() {
                errors.push(FormError::MissingResort { row: row_number });
                None
            } else {
                let resolved = resolve_resort(catalog, resort_text);
                if resolved.id.is_empty() {
                    errors.push(FormError::UnresolvableResort {
                        row: row_number,
                        text: resort_text.to_owned(),
                    });
                    None
                } else {
                    Some(resolved)
                }
            };

            let days = parse_whole(&row.days).filter(|days| *days >= 1);
            if days.is_none() {
                errors.push(FormError::InvalidDays { row: row_number });
            }

            if let (Some(resolved), Some(days)) = (resolved, days) {
                resorts.push(ResortSelection {
                    resort_id: resolved.id,
                    resort_name: resolved.name,
                    days,
                    no_weekends: row.no_weekends,
                    no_blackouts: row.no_blackouts,
                });
            }
        }

        if self.riders.is_empty() {
            errors.push(FormError::NoRiders);
        }
        if resort_rows_seen == 0 {
            errors.push(FormError::NoResorts);
        }

        if errors.is_empty() {
            Ok(ValidatedForm { riders, resorts })
        } else {
            Err(FormErrors(errors))
        }
    }
}

/// Typed riders and resorts ready for payload building.
///
/// Holds at least one rider and at least one resort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    riders: Vec<Rider>,
    resorts: Vec<ResortSelection>,
}

impl ValidatedForm {
    /// Validated riders in form order.
    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    /// Validated resorts in form order.
    pub fn resorts(&self) -> &[ResortSelection] {
        &self.resorts
    }
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Rider age is blank, negative, or not a whole number.
    #[error("Rider {row}: age is required and must be 0 or greater.")]
    InvalidAge {
        /// One-based rider row.
        row: usize,
    },
    /// Resort row has days but no resort text.
    #[error("Resort {row}: resort name is required.")]
    MissingResort {
        /// One-based resort row.
        row: usize,
    },
    /// Resort text has no usable characters for an identifier.
    #[error("Resort {row}: \"{text}\" does not name a resort.")]
    UnresolvableResort {
        /// One-based resort row.
        row: usize,
        /// Text as typed.
        text: String,
    },
    /// Days are blank, zero, or not a whole number.
    #[error("Resort {row}: days must be a whole number of 1 or greater.")]
    InvalidDays {
        /// One-based resort row.
        row: usize,
    },
    /// The form has no rider rows.
    #[error("Add at least one rider.")]
    NoRiders,
    /// The form has no non-blank resort rows.
    #[error("Add at least one resort.")]
    NoResorts,
}

/// Every validation problem found in a form, in row order.
///
/// Displays as one message per line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
pub struct FormErrors(Vec<FormError>);

impl FormErrors {
    /// Individual problems in row order.
    pub fn errors(&self) -> &[FormError] {
        &self.0
    }

    /// Messages in row order, one per problem.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

fn remove_row<T: Default>(rows: &mut Vec<T>, index: usize) -> bool {
    if index >= rows.len() {
        return false;
    }
    if rows.len() == 1 {
        rows[0] = T::default();
    } else {
        rows.remove(index);
    }
    true
}

fn parse_whole(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok()
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}
