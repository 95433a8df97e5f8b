/*!
 * Error types for the dyncontent-uploader application.
 *
 * This module contains custom error types for each stage of a run,
 * using the thiserror crate for ergonomic error definitions:
 * - `ConfigError`: settings that are missing or invalid
 * - `ApiError`: failures fetching the locale directory
 * - `TableError`: failures reading the translations table
 * - `UploadError`: classified failures creating one dynamic content item
 * - `AppError`: fatal failures that end a run, mapped to exit codes
 */

use thiserror::Error;

use crate::app_config::ConfigField;

/// Exit status when every upload succeeded
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status for configuration or locale-fetch failures
pub const EXIT_PREFLIGHT_FAILURE: i32 = 1;

/// Exit status for translation table failures
pub const EXIT_TABLE_FAILURE: i32 = 2;

/// Exit status when items failed and escalation was requested
pub const EXIT_ITEM_FAILURE: i32 = 3;

/// Errors in the resolved settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required settings were never supplied
    #[error("Missing required settings: {}", format_fields(.0))]
    Missing(Vec<ConfigField>),

    /// A setting was supplied but cannot be used
    #[error("Invalid setting {field}: {message}")]
    Invalid {
        /// Which setting was rejected
        field: String,
        /// Why it was rejected
        message: String,
    },

    /// The settings file could not be read or decoded
    #[error("Settings file {path}: {message}")]
    File {
        /// Path of the settings file
        path: String,
        /// Underlying failure
        message: String,
    },
}

fn format_fields(fields: &[ConfigField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur when reading from the remote API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The instance could not be reached at all
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// The response was not the JSON shape we expect
    #[error("Failed to parse API response: {0}")]
    Format(String),

    /// The instance answered with a non-success status
    #[error("API responded with error: {status_code} - {message}")]
    Upstream {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },
}

/// Errors that can occur while parsing the translations table
#[derive(Error, Debug)]
pub enum TableError {
    /// The file could not be opened or read
    #[error("Failed to read translations file {path}: {source}")]
    Io {
        /// Path of the table
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A row could not be interpreted
    #[error("Malformed translations table at row {row}: {message}")]
    Format {
        /// Zero-based row index, the header being row 0
        row: usize,
        /// What is wrong with the row
        message: String,
    },

    /// A locale column does not exist on the instance (strict mode only)
    #[error("Column '{code}' (column {column}) is not a locale installed on the instance")]
    UnmappedLocale {
        /// Zero-based column index
        column: usize,
        /// Header label of the column
        code: String,
    },
}

/// Classified failures for a single dynamic content upload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The credentials were rejected
    #[error("{status} - {message}")]
    Authentication {
        /// HTTP status line
        status: String,
        /// The API's `error` field
        message: String,
    },

    /// The subdomain does not resolve to an instance
    #[error("{status} - Subdomain {subdomain}.zendesk.com does not exist")]
    InstanceNotFound {
        /// HTTP status line
        status: String,
        /// The configured subdomain
        subdomain: String,
    },

    /// An item with the same name exists
    #[error("{status} - Name has already been taken")]
    DuplicateName {
        /// HTTP status line
        status: String,
    },

    /// The generated placeholder collides with an existing one
    #[error("{status} - Name already used in dynamic content placeholder")]
    DuplicatePlaceholder {
        /// HTTP status line
        status: String,
    },

    /// A variant references a locale the instance does not have
    #[error("{status} - One or more locales not installed in Zendesk Instance")]
    InvalidLocale {
        /// HTTP status line
        status: String,
    },

    /// Anything the rule table does not recognise
    #[error("{status} - {body}")]
    Unclassified {
        /// HTTP status line
        status: String,
        /// Raw response body
        body: String,
    },

    /// The request never got a response
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// The record could not be encoded
    #[error("Failed to encode payload: {0}")]
    Serialization(String),
}

/// Fatal errors that end a run before any upload
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings are missing or invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The locale directory could not be obtained
    #[error("Unable to connect to Zendesk instance or parse installed languages. Check subdomain is correct: {0}")]
    Directory(#[from] ApiError),

    /// The translations table could not be parsed
    #[error("Translations CSV file missing or incorrect: {0}")]
    Table(#[from] TableError),
}

impl AppError {
    /// Process exit status for this failure class
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Directory(_) => EXIT_PREFLIGHT_FAILURE,
            Self::Table(_) => EXIT_TABLE_FAILURE,
        }
    }
}
