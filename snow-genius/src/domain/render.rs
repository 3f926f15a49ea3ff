//! Plain-text rendering of scoring responses.

use std::fmt::{self, Write};

use serde_json::{Map, Value};

use super::recommendation::{
    PassPick, Recommendation, ResponseBody, ScoringResponse, Unmet, display_text,
};

const NO_RECOMMENDATIONS: &str = "No results returned.";
const NO_VALID_PASSES: &str = "No results.";

/// Presentation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Titles cards by strategy and appends the strategy to each summary.
    pub dev_mode: bool,
}

/// Renders a response as text, ending with a newline.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use snow_genius::domain::{render_response, RenderOptions, ScoringResponse};
///
/// let response = ScoringResponse::from_value(json!({"results": []}));
/// assert_eq!(
///     render_response(&response, RenderOptions::default()),
///     "No results returned.\n"
/// );
/// ```
pub fn render_response(response: &ScoringResponse, options: RenderOptions) -> String {
    let mut out = String::new();
    // Writing into a `String` never fails.
    match write_response(&mut out, response, options) {
        Ok(()) | Err(fmt::Error) => out,
    }
}

/// Writes the rendered response into `out`.
///
/// # Errors
///
/// Returns [`fmt::Error`] when the sink rejects a write.
pub fn write_response(
    out: &mut impl Write,
    response: &ScoringResponse,
    options: RenderOptions,
) -> fmt::Result {
    match response.body() {
        ResponseBody::Recommendations(results) => render_recommendations(out, results, options),
        ResponseBody::ValidPasses(rows) => render_valid_passes(out, rows),
        ResponseBody::BestCombo { combo, total_cost } => {
            render_best_combo(out, combo, *total_cost)
        }
        ResponseBody::Raw => render_raw(out, response.raw()),
    }
}

/// Formats a dollar amount as whole US dollars, such as `$1,249`.
///
/// Halves round away from zero.
///
/// # Examples
///
/// ```
/// use snow_genius::domain::format_usd;
///
/// assert_eq!(format_usd(1249.4), "$1,249");
/// assert_eq!(format_usd(0.5), "$1");
/// assert_eq!(format_usd(-12.0), "-$12");
/// ```
pub fn format_usd(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}")
}

fn render_recommendations(
    out: &mut impl Write,
    results: &[Recommendation],
    options: RenderOptions,
) -> fmt::Result {
    if results.is_empty() {
        return writeln!(out, "{NO_RECOMMENDATIONS}");
    }
    for (index, result) in results.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        render_card(out, index, result, options)?;
    }
    Ok(())
}

fn render_card(
    out: &mut impl Write,
    index: usize,
    result: &Recommendation,
    options: RenderOptions,
) -> fmt::Result {
    let title = if options.dev_mode {
        format!(
            "{} Recommendation",
            result.strategy.as_deref().unwrap_or("result").to_uppercase()
        )
    } else {
        format!("Recommendation {}", index + 1)
    };
    writeln!(out, "{title}  {}", format_usd(result.price))?;

    write!(out, "{} pass(es)", result.pass_count)?;
    if options.dev_mode {
        if let Some(strategy) = &result.strategy {
            write!(out, " • Strategy: {strategy}")?;
        }
    }
    writeln!(out)?;

    render_pass_groups(out, &result.passes)?;
    render_unmet(out, &result.unmet)
}

fn render_pass_groups(out: &mut impl Write, passes: &[PassPick]) -> fmt::Result {
    let mut rider_indices = passes.iter().map(|p| p.rider_index).collect::<Vec<_>>();
    rider_indices.sort_unstable();
    rider_indices.dedup();

    for rider_index in rider_indices {
        let group = passes
            .iter()
            .filter(|p| p.rider_index == rider_index)
            .collect::<Vec<_>>();
        let category = group
            .first()
            .and_then(|p| p.rider_category.as_deref())
            .map(|c| format!(" ({c})"))
            .unwrap_or_default();
        writeln!(out, "  Rider {}{category}", rider_index.saturating_add(1))?;
        for pick in group {
            let brand = if pick.is_ikon() { "[IKON] " } else { "" };
            writeln!(
                out,
                "    {brand}{}  {}",
                pick.display_name(),
                format_usd(pick.price)
            )?;
        }
    }
    Ok(())
}

fn render_unmet(out: &mut impl Write, unmet: &Unmet) -> fmt::Result {
    if unmet.is_empty() {
        return Ok(());
    }
    writeln!(out, "  Unmet:")?;
    if let Some(reason) = &unmet.reason {
        writeln!(out, "    {reason}")?;
    }
    for (resort, days) in &unmet.deficits {
        writeln!(out, "    {resort}: {days} day(s) still uncovered")?;
    }
    Ok(())
}

fn render_valid_passes(out: &mut impl Write, rows: &[Map<String, Value>]) -> fmt::Result {
    if rows.is_empty() {
        return writeln!(out, "{NO_VALID_PASSES}");
    }
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(*column).map(display_text).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header = columns.iter().map(|c| (*c).to_owned()).collect::<Vec<_>>();
    render_table(out, &header, &cells)
}

fn render_best_combo(
    out: &mut impl Write,
    combo: &[String],
    total_cost: Option<f64>,
) -> fmt::Result {
    let combo_text = if combo.is_empty() {
        "-".to_owned()
    } else {
        combo.join(" + ")
    };
    let total_text = total_cost.map_or_else(|| "-".to_owned(), |total| format!("${total}"));
    render_table(
        out,
        &["Best Combo".to_owned(), "Total Cost".to_owned()],
        &[vec![combo_text, total_text]],
    )
}

fn render_raw(out: &mut impl Write, raw: &Value) -> fmt::Result {
    let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
    writeln!(out, "{pretty}")
}

fn render_table(out: &mut impl Write, header: &[String], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths = header.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_row(out, header, &widths)?;
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    writeln!(out, "{rule}")?;
    for row in rows {
        push_row(out, row, &widths)?;
    }
    Ok(())
}

fn push_row(out: &mut impl Write, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "{}", line.trim_end())
}
