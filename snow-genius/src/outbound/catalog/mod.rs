//! Resort catalog loading from a file or an HTTP(S) URL.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use reqwest::{Client, Url};
use resort_catalog::{CatalogError, ResortCatalog};
use thiserror::Error;
use tracing::info;

/// Where the resort catalog lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Path on the local filesystem.
    File(Utf8PathBuf),
    /// `http` or `https` URL.
    Url(Url),
}

impl FromStr for CatalogSource {
    type Err = CatalogLoadError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Url::parse(trimmed)
                .map(Self::Url)
                .map_err(|error| CatalogLoadError::InvalidUrl {
                    url: trimmed.to_owned(),
                    message: error.to_string(),
                });
        }
        Ok(Self::File(Utf8PathBuf::from(trimmed)))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{path}"),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// The catalog could not be read or parsed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The catalog URL answered with a non-success status.
    #[error("Failed to load resorts ({status})")]
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The catalog request failed before a response arrived.
    #[error("failed to fetch resort catalog: {0}")]
    Transport(#[from] reqwest::Error),
    /// The catalog directory could not be opened.
    #[error("failed to open catalog directory `{path}`: {message}")]
    Directory {
        /// Directory path.
        path: Utf8PathBuf,
        /// Underlying I/O message.
        message: String,
    },
    /// The source looked like a URL but did not parse.
    #[error("invalid catalog URL `{url}`: {message}")]
    InvalidUrl {
        /// Text as given.
        url: String,
        /// Parser message.
        message: String,
    },
}

/// Loads and indexes the resort catalog.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    client: Client,
}

impl CatalogLoader {
    /// Build a loader whose HTTP requests use `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Load the catalog from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogLoadError`] when the source cannot be read, answers
    /// with a non-success status, or holds no usable catalog.
    pub async fn load(&self, source: &CatalogSource) -> Result<ResortCatalog, CatalogLoadError> {
        let catalog = match source {
            CatalogSource::File(path) => load_file(path)?,
            CatalogSource::Url(url) => self.load_url(url).await?,
        };
        info!(%source, resorts = catalog.len(), "loaded resort catalog");
        Ok(catalog)
    }

    async fn load_url(&self, url: &Url) -> Result<ResortCatalog, CatalogLoadError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogLoadError::Http {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        Ok(ResortCatalog::from_slice(&body)?)
    }
}

fn load_file(path: &Utf8Path) -> Result<ResortCatalog, CatalogLoadError> {
    let (dir_path, file_name) = split_path(path);
    let dir = Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|error| {
        CatalogLoadError::Directory {
            path: dir_path.to_path_buf(),
            message: error.to_string(),
        }
    })?;
    Ok(ResortCatalog::from_file(&dir, file_name)?)
}

fn split_path(path: &Utf8Path) -> (&Utf8Path, &Utf8Path) {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file = path.file_name().map_or(path, Utf8Path::new);
    (dir, file)
}
