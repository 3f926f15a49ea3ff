//! Interpretation of scoring responses.
//!
//! The services have answered with several shapes over time. Decoding never
//! fails: a body that matches no known shape is kept as raw JSON and rendered
//! as such. Individual fields are read leniently, so a missing or mistyped
//! price becomes zero rather than losing the whole recommendation.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

/// A decoded scoring response alongside the raw JSON it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResponse {
    raw: Value,
    body: ResponseBody,
}

impl ScoringResponse {
    /// Interprets a response body.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use snow_genius::domain::{ResponseBody, ScoringResponse};
    ///
    /// let response = ScoringResponse::from_value(json!({
    ///     "results": [{"strategy": "single", "pass_count": 1, "price": 999}]
    /// }));
    /// let ResponseBody::Recommendations(results) = response.body() else {
    ///     panic!("expected recommendations");
    /// };
    /// assert_eq!(results[0].pass_count, 1);
    /// ```
    pub fn from_value(raw: Value) -> Self {
        let body = ResponseBody::from_value(&raw);
        Self { raw, body }
    }

    /// The response exactly as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The interpreted body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }
}

/// Known response shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `{"results": [...]}` from the multi-pass and auto services. An empty
    /// object is read as an empty result list.
    Recommendations(Vec<Recommendation>),
    /// `{"valid_passes": [...]}` from the single-pass service, or a bare
    /// array of rows.
    ValidPasses(Vec<Map<String, Value>>),
    /// `{"best_combo": [...], "total_cost": n}` from early multi-pass builds.
    BestCombo {
        /// Pass names in the combination.
        combo: Vec<String>,
        /// Total price, when the service reported a number.
        total_cost: Option<f64>,
    },
    /// Anything else.
    Raw,
}

impl ResponseBody {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(rows) => Self::ValidPasses(object_rows(rows)),
            Value::Object(fields) => Self::from_object(fields),
            _ => Self::Raw,
        }
    }

    fn from_object(fields: &Map<String, Value>) -> Self {
        if fields.is_empty() {
            return Self::Recommendations(Vec::new());
        }
        if let Some(results) = fields.get("results") {
            return Self::Recommendations(recommendations(results));
        }
        if let Some(Value::Array(rows)) = fields.get("valid_passes") {
            return Self::ValidPasses(object_rows(rows));
        }
        let combo = fields.get("best_combo").filter(|v| is_truthy(v));
        let total = fields.get("total_cost").filter(|v| is_truthy(v));
        if combo.is_some() || total.is_some() {
            return Self::BestCombo {
                combo: match combo {
                    Some(Value::Array(items)) => items.iter().map(display_text).collect(),
                    Some(other) => vec![display_text(other)],
                    None => Vec::new(),
                },
                total_cost: total.and_then(Value::as_f64),
            };
        }
        Self::Raw
    }
}

/// One recommended set of passes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    /// Strategy label reported by the service, such as `"single"`.
    #[serde(deserialize_with = "lenient_text")]
    pub strategy: Option<String>,
    /// Number of passes in the recommendation.
    #[serde(deserialize_with = "lenient_count")]
    pub pass_count: u64,
    /// Total price in US dollars.
    #[serde(deserialize_with = "lenient_price")]
    pub price: f64,
    /// Passes to buy.
    #[serde(deserialize_with = "lenient_passes")]
    pub passes: Vec<PassPick>,
    /// Resort days the recommendation leaves uncovered.
    #[serde(deserialize_with = "lenient_unmet")]
    pub unmet: Unmet,
}

/// One pass assigned to one rider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PassPick {
    /// Backend pass identifier.
    #[serde(deserialize_with = "lenient_text")]
    pub pass_id: Option<String>,
    /// Display name.
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Price in US dollars.
    #[serde(deserialize_with = "lenient_price")]
    pub price: f64,
    /// Zero-based index of the rider in the request. Anything but a JSON
    /// integer groups the pass under the first rider.
    #[serde(deserialize_with = "rider_index")]
    pub rider_index: u64,
    /// Category the service priced the rider under.
    #[serde(deserialize_with = "lenient_text")]
    pub rider_category: Option<String>,
    /// Days the pass covers.
    #[serde(deserialize_with = "lenient_optional_count")]
    pub total_days: Option<u64>,
}

impl PassPick {
    /// Name, else pass id, else `"Unknown pass"`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.pass_id.as_deref())
            .unwrap_or("Unknown pass")
    }

    /// Whether the name or id carries the Ikon brand as a whole word.
    pub fn is_ikon(&self) -> bool {
        [self.name.as_deref(), self.pass_id.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| {
                text.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .any(|word| word.eq_ignore_ascii_case("ikon"))
            })
    }
}

/// Uncovered days, keyed by resort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unmet {
    /// Explanation from the service, if any.
    pub reason: Option<String>,
    /// `(resort, days)` pairs sorted by resort key.
    pub deficits: Vec<(String, String)>,
}

impl Unmet {
    /// Whether there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.reason.is_none() && self.deficits.is_empty()
    }

    fn from_value(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };
        let reason = fields
            .get("reason")
            .filter(|v| is_truthy(v))
            .map(display_text);
        let mut deficits = fields
            .iter()
            .filter(|(key, _)| key.as_str() != "reason")
            .map(|(key, days)| (key.clone(), display_text(days)))
            .collect::<Vec<_>>();
        deficits.sort_by(|a, b| a.0.cmp(&b.0));
        Self { reason, deficits }
    }
}

fn recommendations(value: &Value) -> Vec<Recommendation> {
    let Value::Array(items) = value else {
        debug!("results field is not an array; treating as empty");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match Recommendation::deserialize(item) {
            Ok(recommendation) => Some(recommendation),
            Err(error) => {
                debug!(%error, "skipping undecodable recommendation");
                None
            }
        })
        .collect()
}

fn object_rows(rows: &[Value]) -> Vec<Map<String, Value>> {
    rows.iter()
        .filter_map(|row| row.as_object().cloned())
        .collect()
}

/// JSON truthiness: `null`, `false`, zero, and `""` are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain text for a JSON value: strings unquoted, everything else as JSON.
pub(crate) fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().unwrap_or_default(),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or_default(),
        _ => 0.0,
    };
    Ok(if price.is_finite() { price } else { 0.0 })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional_count(deserializer).map(Option::unwrap_or_default)
}

fn rider_index<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_u64()
        .unwrap_or_default())
}

fn lenient_optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    })
}

fn lenient_passes<'de, D>(deserializer: D) -> Result<Vec<PassPick>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| PassPick::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_unmet<'de, D>(deserializer: D) -> Result<Unmet, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Unmet::from_value(&value))
}
