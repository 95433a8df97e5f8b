/*!
 * # dyncontent-uploader - Bulk creation of Zendesk dynamic content
 *
 * A Rust library for creating localized dynamic content items on a Zendesk
 * instance from a spreadsheet of translations.
 *
 * ## Features
 *
 * - Fetch the locales installed on an instance
 * - Parse a CSV table (`name` column plus one column per locale) into
 *   translation records with one variant per language
 * - Create one dynamic content item per row, sequentially
 * - Classify failed uploads into actionable causes
 *   (authentication, unknown instance, duplicate name, duplicate
 *   placeholder, invalid locale)
 * - Keep going past failed items and report them by name
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Settings loading, merging and validation
 * - `locales`: Locale directory of an instance
 * - `table`: Translation table parsing
 * - `uploader`: Payload building and item creation
 * - `batch`: Orchestration of one run
 * - `reporting`: Run event sinks
 * - `zendesk`: HTTP transport, wire format and failure classification:
 *   - `zendesk::client`: reqwest client
 *   - `zendesk::mock`: scripted transport for tests
 *   - `zendesk::wire`: JSON envelopes
 *   - `zendesk::classify`: ordered failure rules
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod batch;
pub mod errors;
pub mod locales;
pub mod reporting;
pub mod table;
pub mod uploader;
pub mod zendesk;

// Re-export main types for easier usage
pub use app_config::{Config, ConfigField, PartialConfig, resolve_missing};
pub use batch::{BatchRunner, BatchSummary, RunOptions};
pub use errors::{ApiError, AppError, ConfigError, TableError, UploadError};
pub use locales::{Locale, LocaleDirectory};
pub use table::{TranslationRecord, TranslationTableParser, Variant};
pub use uploader::ContentUploader;
