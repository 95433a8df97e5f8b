use log::debug;
use std::io::Read;

use crate::app_config::Config;
use crate::errors::{AppError, ConfigError, EXIT_ITEM_FAILURE, EXIT_SUCCESS, UploadError};
use crate::locales::LocaleDirectory;
use crate::reporting::Reporter;
use crate::table::{ParsedTable, TranslationTableParser};
use crate::uploader::ContentUploader;
use crate::zendesk::{Credentials, ZendeskTransport};

// @module: One upload run, from locale fetch to the last item

/// Switches that change how a run treats questionable input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Fail at parse time on locale columns the instance does not have
    pub strict_locales: bool,
    /// Exit non-zero when any item failed to upload
    pub fail_on_item_error: bool,
}

/// An item that could not be created
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub name: String,
    pub error: UploadError,
}

/// Outcome of all upload attempts in a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
}

impl BatchSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Exit status for a run that got as far as uploading
    pub fn exit_code(&self, fail_on_item_error: bool) -> i32 {
        if fail_on_item_error && !self.is_success() {
            EXIT_ITEM_FAILURE
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Orchestrates one run against one instance
pub struct BatchRunner<'a> {
    config: &'a Config,
    transport: &'a dyn ZendeskTransport,
    reporter: &'a dyn Reporter,
    options: RunOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        config: &'a Config,
        transport: &'a dyn ZendeskTransport,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            transport,
            reporter,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Run against the configured translations file and return the exit status
    pub async fn run(&self) -> i32 {
        match self.execute().await {
            Ok(summary) => summary.exit_code(self.options.fail_on_item_error),
            Err(error) => {
                self.reporter.fatal(&error);
                error.exit_code()
            }
        }
    }

    /// Fetch locales, parse the configured file and upload every record
    pub async fn execute(&self) -> Result<BatchSummary, AppError> {
        self.check_config()?;
        let locales = self.fetch_locales().await?;
        let table = self
            .parser(&locales)
            .parse_path(&self.config.translations_file)?;
        Ok(self.upload_all(table).await)
    }

    /// Same as `execute`, reading the table from `reader`
    pub async fn execute_from_reader<R: Read>(&self, reader: R) -> Result<BatchSummary, AppError> {
        self.check_config()?;
        let locales = self.fetch_locales().await?;
        let table = self.parser(&locales).parse_reader(reader)?;
        Ok(self.upload_all(table).await)
    }

    // Nothing is sent for settings that skipped resolution with blanks in them
    fn check_config(&self) -> Result<(), ConfigError> {
        let missing = self.config.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }

    async fn fetch_locales(&self) -> Result<LocaleDirectory, AppError> {
        let locales = LocaleDirectory::fetch(self.transport).await?;
        self.reporter.locales_loaded(locales.len());
        for ignored in locales.skipped_duplicates() {
            self.reporter.duplicate_locale(ignored);
        }
        Ok(locales)
    }

    fn parser<'d>(&self, locales: &'d LocaleDirectory) -> TranslationTableParser<'d> {
        TranslationTableParser::new(locales).strict_locales(self.options.strict_locales)
    }

    // Records go out one at a time, in table order. A failed item never stops the batch.
    async fn upload_all(&self, table: ParsedTable) -> BatchSummary {
        for column in &table.unmapped_columns {
            self.reporter.unmapped_column(column);
        }

        let uploader = ContentUploader::new(
            self.transport,
            Credentials::new(&self.config.username, &self.config.password),
            &self.config.subdomain,
        );

        let mut summary = BatchSummary::default();
        self.reporter.batch_started(table.records.len());

        for record in &table.records {
            match uploader.upload(record).await {
                Ok(()) => {
                    summary.succeeded += 1;
                    self.reporter.item_uploaded(&record.name);
                }
                Err(error) => {
                    self.reporter.item_failed(&record.name, &error);
                    summary.failures.push(ItemFailure {
                        name: record.name.clone(),
                        error,
                    });
                }
            }
        }

        debug!(
            "Attempted {} item(s), {} failed",
            summary.attempted(),
            summary.failures.len()
        );
        self.reporter.batch_finished(&summary);
        summary
    }
}
