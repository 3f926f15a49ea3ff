//! Wire payloads for the scoring services.
//!
//! Each backend reads a different shape: the multi-pass service wants
//! `resort_days`, the single-pass service wants `resort_plan`, and the auto
//! service wants `resorts` plus an explicit mode. Field names and types here
//! are the contract; `Option` appears only where a backend accepts `null`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use super::form::ValidatedForm;
use super::resort_selection::ResortSelection;
use super::rider::Rider;

const SINGLE_ORIGIN: &str = "https://pass-picker-expert-mode.onrender.com";
const MULTI_ORIGIN: &str = "https://pass-picker-expert-mode-multi.onrender.com";

/// Which scoring backend a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScoringMode {
    /// Best single pass per rider.
    Single,
    /// Best combination of passes across all riders.
    #[default]
    Multi,
    /// Unified service choosing between single and multi.
    Auto,
}

impl ScoringMode {
    /// Path of the scoring route, appended to the service origin.
    pub const fn endpoint_path(self) -> &'static str {
        match self {
            Self::Single => "/expert_mode/calculate",
            Self::Multi => "/score_multi_pass",
            Self::Auto => "/score_pass",
        }
    }

    /// Origin of the hosted service for this mode.
    pub const fn default_origin(self) -> &'static str {
        match self {
            Self::Single => SINGLE_ORIGIN,
            Self::Multi | Self::Auto => MULTI_ORIGIN,
        }
    }

    /// Full URL of the hosted service for this mode.
    pub fn default_endpoint(self) -> String {
        format!("{}{}", self.default_origin(), self.endpoint_path())
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scoring mode `{0}`; expected single, multi, or auto")]
pub struct ParseScoringModeError(String);

impl FromStr for ScoringMode {
    type Err = ParseScoringModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            "auto" => Ok(Self::Auto),
            _ => Err(ParseScoringModeError(value.to_owned())),
        }
    }
}

/// Rider as read by the single-pass and multi-pass services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyRider {
    /// Age in whole years.
    pub age: u32,
    /// `"None"`, `"Military"`, `"Student"`, or `"Nurse"`.
    pub category: &'static str,
}

/// One entry of the multi-pass `resort_days` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResortDay {
    /// Resort identifier.
    pub resort: String,
    /// Resort display name.
    pub resort_name: String,
    /// Ski days.
    pub days: u32,
    /// Whether passes with blackout dates are acceptable.
    pub blackout_ok: bool,
}

/// One entry of the single-pass `resort_plan` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResortPlanItem {
    /// Resort identifier.
    pub resort_id: String,
    /// Ski days.
    pub days: u32,
    /// Whether passes with blackout dates are acceptable.
    pub blackout_ok: bool,
}

/// Rider as read by the auto service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoRider {
    /// Age in whole years.
    pub age: u32,
    /// `null` for no discount, otherwise the lowercase category.
    pub category: Option<&'static str>,
}

/// Resort as read by the auto service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoResort {
    /// Resort identifier.
    pub id: String,
    /// Resort display name.
    pub name: String,
    /// Ski days.
    pub days: u32,
    /// Weekdays only.
    pub no_weekends: bool,
    /// Avoid blackout dates.
    pub no_blackouts: bool,
}

/// Body for `POST /score_multi_pass`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiPassPayload {
    /// Riders in form order.
    pub riders: Vec<LegacyRider>,
    /// Requested resorts in form order.
    pub resort_days: Vec<ResortDay>,
}

/// Body for `POST /expert_mode/calculate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinglePassPayload {
    /// Riders in form order.
    pub riders: Vec<LegacyRider>,
    /// Requested resorts in form order.
    pub resort_plan: Vec<ResortPlanItem>,
}

/// Body for `POST /score_pass`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoPayload {
    /// Riders in form order.
    pub riders: Vec<AutoRider>,
    /// Requested resorts in form order.
    pub resorts: Vec<AutoResort>,
    /// Always `"auto"`.
    pub mode: &'static str,
}

/// A request body for one of the scoring services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScoringPayload {
    /// Multi-pass request.
    Multi(MultiPassPayload),
    /// Single-pass request.
    Single(SinglePassPayload),
    /// Auto request.
    Auto(AutoPayload),
}

impl ScoringPayload {
    /// Mode this payload was built for.
    pub const fn mode(&self) -> ScoringMode {
        match self {
            Self::Multi(_) => ScoringMode::Multi,
            Self::Single(_) => ScoringMode::Single,
            Self::Auto(_) => ScoringMode::Auto,
        }
    }
}

/// Maps validated form state onto the wire shape of the selected backend.
///
/// Riders and resorts keep form order. `blackout_ok` is the inverse of the
/// row's blackout constraint; the weekday constraint is only carried by the
/// auto service.
///
/// # Examples
///
/// ```
/// use resort_catalog::ResortCatalog;
/// use snow_genius::domain::{
///     build_payload, FormState, ResortRow, RiderRow, ScoringMode,
/// };
///
/// let form = FormState::from_rows(
///     vec![RiderRow::new("35", "none")],
///     vec![ResortRow::new("Loon Mountain", "3")],
/// );
/// let validated = form
///     .validate(&ResortCatalog::default())
///     .expect("valid form");
///
/// let payload = build_payload(ScoringMode::Multi, &validated);
/// let json = serde_json::to_value(&payload).expect("serialisable");
/// assert_eq!(json["resort_days"][0]["resort"], "loonmountain");
/// assert_eq!(json["resort_days"][0]["blackout_ok"], true);
/// ```
pub fn build_payload(mode: ScoringMode, form: &ValidatedForm) -> ScoringPayload {
    match mode {
        ScoringMode::Multi => ScoringPayload::Multi(MultiPassPayload {
            riders: legacy_riders(form.riders()),
            resort_days: form.resorts().iter().map(resort_day).collect(),
        }),
        ScoringMode::Single => ScoringPayload::Single(SinglePassPayload {
            riders: legacy_riders(form.riders()),
            resort_plan: form.resorts().iter().map(resort_plan_item).collect(),
        }),
        ScoringMode::Auto => ScoringPayload::Auto(AutoPayload {
            riders: form
                .riders()
                .iter()
                .map(|rider| AutoRider {
                    age: rider.age,
                    category: rider.category.discount_label(),
                })
                .collect(),
            resorts: form.resorts().iter().map(auto_resort).collect(),
            mode: ScoringMode::Auto.as_str(),
        }),
    }
}

fn legacy_riders(riders: &[Rider]) -> Vec<LegacyRider> {
    riders
        .iter()
        .map(|rider| LegacyRider {
            age: rider.age,
            category: rider.category.legacy_label(),
        })
        .collect()
}

fn resort_day(selection: &ResortSelection) -> ResortDay {
    ResortDay {
        resort: selection.resort_id.clone(),
        resort_name: selection.resort_name.clone(),
        days: selection.days,
        blackout_ok: selection.blackout_ok(),
    }
}

fn resort_plan_item(selection: &ResortSelection) -> ResortPlanItem {
    ResortPlanItem {
        resort_id: selection.resort_id.clone(),
        days: selection.days,
        blackout_ok: selection.blackout_ok(),
    }
}

fn auto_resort(selection: &ResortSelection) -> AutoResort {
    AutoResort {
        id: selection.resort_id.clone(),
        name: selection.resort_name.clone(),
        days: selection.days,
        no_weekends: selection.no_weekends,
        no_blackouts: selection.no_blackouts,
    }
}
