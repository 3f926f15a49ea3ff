//! Error types for the resort-catalog crate.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or parsing a resort catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read resort catalog at '{path}': {message}")]
    IoError {
        /// Path to the catalog file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The catalog is not valid JSON.
    #[error("invalid resort catalog JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The catalog JSON is valid but is not an array of rows.
    #[error("resort catalog must be a JSON array of resort rows")]
    NotAnArray,

    /// Every row was skipped because it lacked an identifier or a name.
    #[error("resort catalog contains no usable resort rows")]
    Empty,
}
