/*!
 * Run reporting.
 *
 * The batch runner never logs on its own: it reports events to the
 * `Reporter` it was given. `LogReporter` forwards them to the `log` facade
 * and drives a progress bar; `RecordingReporter` keeps them in memory.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::sync::Mutex;

use crate::batch::BatchSummary;
use crate::errors::{AppError, UploadError};
use crate::locales::Locale;
use crate::table::UnmappedColumn;

/// Sink for everything a run wants a human to know
pub trait Reporter: Send + Sync {
    /// The locale directory was fetched
    fn locales_loaded(&self, count: usize);

    /// The listing repeated a code; `ignored` is the entry that was dropped
    fn duplicate_locale(&self, ignored: &Locale);

    /// A table column will be sent without a locale id
    fn unmapped_column(&self, column: &UnmappedColumn);

    /// Uploads are about to start
    fn batch_started(&self, total: usize);

    fn item_uploaded(&self, name: &str);

    fn item_failed(&self, name: &str, error: &UploadError);

    /// All records were attempted
    fn batch_finished(&self, summary: &BatchSummary);

    /// The run stopped before uploading
    fn fatal(&self, error: &AppError);
}

/// Reporter writing to the console logger
#[derive(Default)]
pub struct LogReporter {
    show_progress: bool,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl LogReporter {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            progress_bar: Mutex::new(None),
        }
    }

    fn bar(&self) -> Option<ProgressBar> {
        self.progress_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    // Keeps log lines from being drawn over by the bar
    fn with_bar_suspended(&self, f: impl FnOnce()) {
        match self.bar() {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}

impl Reporter for LogReporter {
    fn locales_loaded(&self, count: usize) {
        info!("Found {} installed locale(s)", count);
    }

    fn duplicate_locale(&self, ignored: &Locale) {
        warn!(
            "Locale '{}' listed more than once, ignoring id {}",
            ignored.code, ignored.remote_id
        );
    }

    fn unmapped_column(&self, column: &UnmappedColumn) {
        warn!(
            "Column '{}' does not match any locale installed on the instance; its variants will be rejected",
            column.code
        );
    }

    fn batch_started(&self, total: usize) {
        info!("Uploading {} dynamic content item(s)", total);
        if !self.show_progress || total == 0 {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} items ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        *self.progress_bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(bar);
    }

    fn item_uploaded(&self, name: &str) {
        if let Some(bar) = self.bar() {
            bar.set_message(name.to_string());
            bar.inc(1);
        }
    }

    fn item_failed(&self, name: &str, error: &UploadError) {
        self.with_bar_suspended(|| {
            error!("Error uploading translation to Zendesk: {}: {}", name, error);
        });
        if let Some(bar) = self.bar() {
            bar.inc(1);
        }
    }

    fn batch_finished(&self, summary: &BatchSummary) {
        if let Some(bar) = self.progress_bar.lock().unwrap_or_else(|e| e.into_inner()).take() {
            bar.finish_and_clear();
        }

        if summary.failures.is_empty() {
            info!("Uploaded {} item(s)", summary.succeeded);
            return;
        }

        warn!(
            "{} uploaded, {} failed: {}",
            summary.succeeded,
            summary.failures.len(),
            summary
                .failures
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    fn fatal(&self, error: &AppError) {
        error!("{}", error);
    }
}

/// One reported event, as kept by `RecordingReporter`
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    LocalesLoaded(usize),
    DuplicateLocale(Locale),
    UnmappedColumn(UnmappedColumn),
    BatchStarted(usize),
    ItemUploaded(String),
    ItemFailed { name: String, error: UploadError },
    BatchFinished { succeeded: usize, failed: usize },
    Fatal(String),
}

/// Reporter keeping events in memory, in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn push(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl Reporter for RecordingReporter {
    fn locales_loaded(&self, count: usize) {
        self.push(ReportEvent::LocalesLoaded(count));
    }

    fn duplicate_locale(&self, ignored: &Locale) {
        self.push(ReportEvent::DuplicateLocale(ignored.clone()));
    }

    fn unmapped_column(&self, column: &UnmappedColumn) {
        self.push(ReportEvent::UnmappedColumn(column.clone()));
    }

    fn batch_started(&self, total: usize) {
        self.push(ReportEvent::BatchStarted(total));
    }

    fn item_uploaded(&self, name: &str) {
        self.push(ReportEvent::ItemUploaded(name.to_string()));
    }

    fn item_failed(&self, name: &str, error: &UploadError) {
        self.push(ReportEvent::ItemFailed {
            name: name.to_string(),
            error: error.clone(),
        });
    }

    fn batch_finished(&self, summary: &BatchSummary) {
        self.push(ReportEvent::BatchFinished {
            succeeded: summary.succeeded,
            failed: summary.failures.len(),
        });
    }

    fn fatal(&self, error: &AppError) {
        self.push(ReportEvent::Fatal(error.to_string()));
    }
}
