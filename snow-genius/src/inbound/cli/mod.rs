//! Command-line front-end for the scoring client.
//!
//! The binary parses arguments with [`Cli`] and delegates to the helpers
//! here, so argument handling and output can be exercised in tests without
//! spawning a process.

use std::io::{self, Read, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use clap::{Args, Parser, Subcommand};
use resort_catalog::ResortCatalog;
use serde::Serialize;
use thiserror::Error;

use crate::domain::ports::ScoringService;
use crate::domain::{
    FormState, RenderOptions, ResortRow, RiderRow, ScoringMode, SubmissionError,
    SubmissionService, render_response,
};

const FLAG_NO_WEEKENDS: &str = "no-weekends";
const FLAG_NO_BLACKOUTS: &str = "no-blackouts";
const DEFAULT_DAYS: &str = "1";

/// `snow-genius` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "snow-genius",
    about = "Price ski passes for a group of riders with the Snow Genius scoring services",
    version
)]
pub struct Cli {
    /// Resort catalog path or `http(s)` URL.
    #[arg(long, global = true, value_name = "path|url")]
    pub catalog: Option<String>,
    /// Client timeout in seconds.
    #[arg(long = "timeout-secs", global = true, value_name = "secs")]
    pub timeout_secs: Option<u64>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Score a form against a scoring service.
    Score(ScoreArgs),
    /// List catalog resorts matching partially typed text.
    Resorts(ResortsArgs),
}

/// Arguments for `score`.
#[derive(Debug, Clone, Args)]
pub struct ScoreArgs {
    /// Rider as `AGE[:CATEGORY]`, repeatable.
    #[arg(long = "rider", value_name = "AGE[:CATEGORY]", value_parser = parse_rider_spec)]
    pub riders: Vec<RiderRow>,
    /// Resort as `NAME[:DAYS[:FLAGS]]`, repeatable. Flags are `no-weekends`
    /// and `no-blackouts`, comma separated.
    #[arg(long = "resort", value_name = "NAME[:DAYS[:FLAGS]]", value_parser = parse_resort_spec)]
    pub resorts: Vec<ResortRow>,
    /// JSON form file holding `riders` and `resorts` rows.
    #[arg(long, value_name = "path", conflicts_with_all = ["riders", "resorts"])]
    pub form: Option<Utf8PathBuf>,
    /// Scoring backend.
    #[arg(long, value_name = "single|multi|auto")]
    pub mode: Option<ScoringMode>,
    /// Scoring endpoint, overriding `API_URL` and `API_BASE`.
    #[arg(long = "api-url", value_name = "url")]
    pub api_url: Option<String>,
    /// Print the raw request and response and title cards by strategy.
    #[arg(long)]
    pub dev: bool,
    /// Print the payload without sending it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Arguments for `resorts`.
#[derive(Debug, Clone, Args)]
pub struct ResortsArgs {
    /// Partially typed resort text.
    pub query: String,
}

/// Output switches for `score`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreOutput {
    /// Print raw panes and strategy titles.
    pub dev_mode: bool,
    /// Stop after building the payload.
    pub dry_run: bool,
}

/// Errors raised by the command-line helpers.
#[derive(Debug, Error)]
pub enum CliError {
    /// The form file could not be read.
    #[error("failed to read form file `{path}`: {message}")]
    FormRead {
        /// Form file path.
        path: Utf8PathBuf,
        /// Underlying message.
        message: String,
    },
    /// The form file is not a valid form.
    #[error("failed to parse form file `{path}`: {message}")]
    FormParse {
        /// Form file path.
        path: Utf8PathBuf,
        /// Parser message.
        message: String,
    },
    /// Validation or scoring failed.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    /// Output could not be written or serialised.
    #[error("failed to write output: {0}")]
    Output(String),
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        Self::Output(error.to_string())
    }
}

/// Parses `AGE[:CATEGORY]` into a rider row.
///
/// # Errors
///
/// Returns a message when the age is blank.
///
/// # Example
///
/// ```
/// use snow_genius::inbound::cli::parse_rider_spec;
///
/// let row = parse_rider_spec("35:student").expect("valid spec");
/// assert_eq!((row.age.as_str(), row.category.as_str()), ("35", "student"));
/// ```
pub fn parse_rider_spec(raw: &str) -> Result<RiderRow, String> {
    let (age, category) = raw.split_once(':').unwrap_or((raw, ""));
    if age.trim().is_empty() {
        return Err("rider must start with an age, as in `35` or `35:student`".to_owned());
    }
    Ok(RiderRow::new(age.trim(), category.trim()))
}

/// Parses `NAME[:DAYS[:FLAGS]]` into a resort row. Days default to one.
///
/// # Errors
///
/// Returns a message when the name is blank or a flag is unknown.
///
/// # Example
///
/// ```
/// use snow_genius::inbound::cli::parse_resort_spec;
///
/// let row = parse_resort_spec("Loon Mountain, NH:3:no-blackouts").expect("valid spec");
/// assert_eq!(row.resort, "Loon Mountain, NH");
/// assert_eq!(row.days, "3");
/// assert!(row.no_blackouts && !row.no_weekends);
/// ```
pub fn parse_resort_spec(raw: &str) -> Result<ResortRow, String> {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err("resort must start with a name, as in `Stowe:3`".to_owned());
    }
    let days = parts
        .next()
        .map(str::trim)
        .filter(|days| !days.is_empty())
        .unwrap_or(DEFAULT_DAYS);

    let mut row = ResortRow::new(name, days);
    for flag in parts
        .next()
        .unwrap_or_default()
        .split(',')
        .map(|flag| flag.trim().replace('_', "-").to_ascii_lowercase())
        .filter(|flag| !flag.is_empty())
    {
        match flag.as_str() {
            FLAG_NO_WEEKENDS => row.no_weekends = true,
            FLAG_NO_BLACKOUTS => row.no_blackouts = true,
            other => {
                return Err(format!(
                    "unknown resort flag `{other}`; expected {FLAG_NO_WEEKENDS} or {FLAG_NO_BLACKOUTS}"
                ));
            }
        }
    }
    Ok(row)
}

impl ScoreArgs {
    /// Builds the form from `--form` or from the repeated row flags.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] when the form file cannot be read or parsed.
    pub fn form_state(&self) -> Result<FormState, CliError> {
        match &self.form {
            Some(path) => read_form_file(path),
            None => Ok(FormState::from_rows(
                self.riders.clone(),
                self.resorts.clone(),
            )),
        }
    }
}

/// Reads a JSON form file through a capability-scoped directory handle.
///
/// # Errors
///
/// Returns [`CliError::FormRead`] or [`CliError::FormParse`].
pub fn read_form_file(path: &Utf8Path) -> Result<FormState, CliError> {
    let read_error = |error: io::Error| CliError::FormRead {
        path: path.to_path_buf(),
        message: error.to_string(),
    };
    let dir_path = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().map_or(path, Utf8Path::new);
    let dir = Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(read_error)?;
    let mut file = dir.open(file_name).map_err(read_error)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(read_error)?;

    serde_json::from_str(&contents).map_err(|error| CliError::FormParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

/// Writes typeahead suggestions for `query`, one label per line.
///
/// # Errors
///
/// Returns an error when writing fails.
pub fn write_suggestions(
    catalog: &ResortCatalog,
    query: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    let suggestions = catalog.search(query);
    if suggestions.is_empty() {
        return writeln!(out, "No matching resorts.");
    }
    for entry in suggestions {
        writeln!(out, "{}\t{}", entry.label(), entry.id())?;
    }
    Ok(())
}

/// Validates, optionally sends, and renders one submission.
///
/// A dry run prints the payload and makes no call. Dev mode prints the raw
/// request before sending, then the raw response or the scoring error, ahead
/// of the rendered result.
///
/// # Errors
///
/// Returns [`CliError`] when validation or scoring fails or output cannot be
/// written.
pub async fn run_score<S>(
    service: &SubmissionService<S>,
    form: &FormState,
    catalog: &ResortCatalog,
    output: ScoreOutput,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: ScoringService + ?Sized,
{
    let payload = service.prepare(form, catalog)?;
    if output.dry_run {
        writeln!(out, "{}", pretty_json(&payload)?)?;
        return Ok(());
    }

    if output.dev_mode {
        writeln!(out, "Request ({}):", service.mode())?;
        writeln!(out, "{}", pretty_json(&payload)?)?;
        writeln!(out)?;
    }
    let submission = match service.send(payload).await {
        Ok(submission) => submission,
        Err(error) => {
            if output.dev_mode {
                writeln!(out, "Response:")?;
                writeln!(out, "{error}")?;
                writeln!(out)?;
            }
            return Err(error.into());
        }
    };
    if output.dev_mode {
        writeln!(out, "Response:")?;
        writeln!(out, "{}", pretty_json(submission.response.raw())?)?;
        writeln!(out)?;
    }
    let rendered = render_response(
        &submission.response,
        RenderOptions {
            dev_mode: output.dev_mode,
        },
    );
    write!(out, "{rendered}")?;
    Ok(())
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|error| CliError::Output(error.to_string()))
}
