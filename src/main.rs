// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use dyncontent_uploader::app_config::{self, ConfigField, PartialConfig, resolve_missing};
use dyncontent_uploader::batch::{BatchRunner, RunOptions};
use dyncontent_uploader::errors::{AppError, ConfigError, EXIT_PREFLIGHT_FAILURE};
use dyncontent_uploader::reporting::LogReporter;
use dyncontent_uploader::zendesk::client::ZendeskClient;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload the translations table (default command)
    Upload(UploadArgs),

    /// Generate shell completions for dyncontent-uploader
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct UploadArgs {
    /// JSON settings file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Zendesk subdomain (the `acme` in acme.zendesk.com)
    #[arg(short, long, env = "ZENDESK_SUBDOMAIN")]
    subdomain: Option<String>,

    /// Agent email address
    #[arg(short, long, env = "ZENDESK_USERNAME")]
    username: Option<String>,

    /// Agent password or `email/token` API token
    #[arg(short, long, env = "ZENDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// CSV file with a `name` column and one column per locale
    #[arg(short, long, env = "ZENDESK_TRANSLATIONS_FILE", value_name = "CSV")]
    translations_file: Option<String>,

    /// Instance root URL replacing https://{subdomain}.zendesk.com
    #[arg(long, hide = true)]
    base_url: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Fail before uploading if a column is not an installed locale
    #[arg(long)]
    strict_locales: bool,

    /// Exit with status 3 when any item fails to upload
    #[arg(long)]
    fail_on_item_error: bool,

    /// Never ask for missing settings
    #[arg(long)]
    no_prompt: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl UploadArgs {
    fn as_partial(&self) -> PartialConfig {
        PartialConfig {
            subdomain: self.subdomain.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            translations_file: self.translations_file.clone(),
            base_url: self.base_url.clone(),
            log_level: self.log_level.map(Into::into),
        }
    }
}

/// dyncontent-uploader - Bulk creation of Zendesk dynamic content
///
/// Reads a CSV of translations and creates one dynamic content item per row
/// on a Zendesk instance.
#[derive(Parser, Debug)]
#[command(name = "dyncontent-uploader")]
#[command(version)]
#[command(about = "Create Zendesk dynamic content items from a CSV of translations")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "Creates localized Zendesk dynamic content items from a CSV of translations.

The CSV needs a header row with a `name` column and one column per locale
code installed on the instance. The first locale column is the default
variant of every item.

EXAMPLES:
    dyncontent-uploader -c settings.json
    dyncontent-uploader -s acme -u agent@acme.com -t translations.csv
    dyncontent-uploader --strict-locales --fail-on-item-error -c settings.json
    dyncontent-uploader completions bash > dyncontent-uploader.bash

SETTINGS:
    Values are read from the settings file, then environment variables,
    then flags. Anything still missing is asked for on the terminal
    unless --no-prompt is given.

EXIT STATUS:
    0  all items uploaded (or item failures without --fail-on-item-error)
    1  invalid command line, settings or locale fetch failed
    2  translations table could not be parsed
    3  at least one item failed and --fail-on-item-error was given")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    upload: UploadArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                label,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is raised or lowered once settings are known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            // A bad command line is a settings failure, not clap's usage status
            _ => {
                let _ = e.print();
                std::process::exit(EXIT_PREFLIGHT_FAILURE);
            }
        },
    };

    let code = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dyncontent-uploader", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Upload(args)) => run_upload(args).await,
        None => run_upload(cli.upload).await,
    };

    log::logger().flush();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

async fn run_upload(args: UploadArgs) -> i32 {
    // If log level is set via command line, apply it immediately
    if let Some(level) = args.log_level {
        log::set_max_level(level_filter(level.into()));
    }

    let file_settings = match &args.config {
        Some(path) => match PartialConfig::from_file(path) {
            Ok(settings) => settings,
            Err(e) => return preflight_failure(e),
        },
        None => PartialConfig::default(),
    };
    let partial = file_settings.merge(args.as_partial());

    let answers = if args.no_prompt {
        Vec::new()
    } else {
        prompt_for(&partial.missing())
    };

    let config = match resolve_missing(partial, &answers) {
        Ok(config) => config,
        Err(missing) => return preflight_failure(ConfigError::Missing(missing)),
    };
    let config = match config.validate() {
        Ok(config) => config,
        Err(e) => return preflight_failure(e),
    };

    // If log level was not set via command line, take it from settings now
    if args.log_level.is_none() {
        log::set_max_level(level_filter(config.log_level));
    }
    debug!("Using instance {}", config.instance_url());

    let transport = ZendeskClient::new(config.instance_url());
    let reporter = LogReporter::new(!args.no_progress);
    let options = RunOptions {
        strict_locales: args.strict_locales,
        fail_on_item_error: args.fail_on_item_error,
    };

    BatchRunner::new(&config, &transport, &reporter)
        .with_options(options)
        .run()
        .await
}

fn preflight_failure(error: ConfigError) -> i32 {
    error!("{}", AppError::from(error));
    EXIT_PREFLIGHT_FAILURE
}

// Asks for each field on the terminal; blank answers stay missing
fn prompt_for(fields: &[ConfigField]) -> Vec<(ConfigField, String)> {
    let stdin = std::io::stdin();
    let mut answers = Vec::new();

    for field in fields {
        print!("{}: ", field.label());
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => answers.push((*field, line.trim().to_string())),
        }
    }

    answers
}
