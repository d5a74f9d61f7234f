//! Error types for the Morphmark library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`MorphmarkError`] enum. Failures that only affect one paragraph or one
//! page are not errors of the run: they are collected as [`UnitFailure`]s in
//! the analysis report so a large document still comes back mostly
//! highlighted.
//!
//! # Examples
//!
//! ```
//! use morphmark::error::{MorphmarkError, Result};
//!
//! fn open_document() -> Result<()> {
//!     Err(MorphmarkError::document("word/document.xml is missing"))
//! }
//!
//! match open_document() {
//!     Ok(_) => println!("Opened"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for Morphmark operations.
#[derive(Error, Debug)]
pub enum MorphmarkError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip container errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed or unexpected markup
    #[error("XML error: {0}")]
    Xml(String),

    /// The document cannot be opened or parsed at all
    #[error("Document error: {0}")]
    Document(String),

    /// PDF backend errors
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Analysis-related errors (tokenization, morphology, search)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid regular expression
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Error with context attached by the command-line glue
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with MorphmarkError.
pub type Result<T> = std::result::Result<T, MorphmarkError>;

impl MorphmarkError {
    /// Create a new XML error.
    pub fn xml<S: Into<String>>(msg: S) -> Self {
        MorphmarkError::Xml(msg.into())
    }

    /// Create a new document error.
    pub fn document<S: Into<String>>(msg: S) -> Self {
        MorphmarkError::Document(msg.into())
    }

    /// Create a new PDF error.
    pub fn pdf<S: Into<String>>(msg: S) -> Self {
        MorphmarkError::Pdf(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        MorphmarkError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MorphmarkError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MorphmarkError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MorphmarkError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error means the document itself is unusable.
    pub fn is_systemic(&self) -> bool {
        matches!(
            self,
            MorphmarkError::Document(_) | MorphmarkError::Zip(_) | MorphmarkError::Io(_)
        )
    }
}

impl From<quick_xml::Error> for MorphmarkError {
    fn from(error: quick_xml::Error) -> Self {
        MorphmarkError::Xml(error.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for MorphmarkError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        MorphmarkError::Xml(error.to_string())
    }
}

/// The unit of work a failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "index", rename_all = "lowercase")]
pub enum Unit {
    /// A paragraph, numbered in processing order.
    Paragraph(usize),
    /// A PDF page (0-based).
    Page(usize),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Paragraph(n) => write!(f, "paragraph {n}"),
            Unit::Page(n) => write!(f, "page {n}"),
        }
    }
}

/// A failure isolated to one paragraph or page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitFailure {
    #[serde(flatten)]
    pub unit: Unit,
    pub message: String,
}

impl UnitFailure {
    pub fn new(unit: Unit, error: &MorphmarkError) -> Self {
        UnitFailure {
            unit,
            message: error.to_string(),
        }
    }
}
