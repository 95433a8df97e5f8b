use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

use crate::errors::ConfigError;

// Application configuration module
// This module handles the run settings: loading the optional settings file,
// merging values from other sources and validating the result.

/// Log verbosity for the console logger
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// A required setting, in the order it is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Subdomain,
    Username,
    Password,
    TranslationsFile,
}

impl ConfigField {
    /// All required settings in prompt order
    pub const ALL: [ConfigField; 4] = [
        ConfigField::Subdomain,
        ConfigField::Username,
        ConfigField::Password,
        ConfigField::TranslationsFile,
    ];

    // @returns: Human readable label used in prompts and errors
    pub fn label(&self) -> &'static str {
        match self {
            Self::Subdomain => "Subdomain",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::TranslationsFile => "Translations filename",
        }
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Settings file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    Json,
    Yaml,
}

impl SettingsFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Settings as gathered from a source that may leave any of them out
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(
        default,
        rename = "translationsFile",
        alias = "translations_file",
        skip_serializing_if = "Option::is_none"
    )]
    pub translations_file: Option<String>,

    /// Replaces `https://{subdomain}.zendesk.com` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
}

impl PartialConfig {
    /// Load settings from a YAML file, or from JSON when the extension is `.json`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_error = |message: String| ConfigError::File {
            path: path.display().to_string(),
            message,
        };

        let content = fs::read(path).map_err(|e| file_error(e.to_string()))?;

        match SettingsFormat::from_path(path) {
            SettingsFormat::Json => {
                serde_json::from_slice(&content).map_err(|e| file_error(e.to_string()))
            }
            // An empty YAML document carries no settings at all
            SettingsFormat::Yaml if content.iter().all(u8::is_ascii_whitespace) => {
                Ok(Self::default())
            }
            SettingsFormat::Yaml => {
                serde_yaml::from_slice(&content).map_err(|e| file_error(e.to_string()))
            }
        }
    }

    /// Overlay every value set in `other` on top of this one
    pub fn merge(mut self, other: PartialConfig) -> Self {
        if other.subdomain.is_some() {
            self.subdomain = other.subdomain;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.translations_file.is_some() {
            self.translations_file = other.translations_file;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        self
    }

    /// Value currently held for a required setting, empty strings count as absent
    pub fn get(&self, field: ConfigField) -> Option<&str> {
        let value = match field {
            ConfigField::Subdomain => self.subdomain.as_deref(),
            ConfigField::Username => self.username.as_deref(),
            ConfigField::Password => self.password.as_deref(),
            ConfigField::TranslationsFile => self.translations_file.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, field: ConfigField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            ConfigField::Subdomain => self.subdomain = value,
            ConfigField::Username => self.username = value,
            ConfigField::Password => self.password = value,
            ConfigField::TranslationsFile => self.translations_file = value,
        }
    }

    /// Required settings that still have no value, in prompt order
    pub fn missing(&self) -> Vec<ConfigField> {
        ConfigField::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub subdomain: String,
    pub username: String,
    pub password: String,
    pub translations_file: String,
    pub base_url: Option<String>,
    pub log_level: LogLevel,
}

/// Fill the gaps in `config` with `provided` answers.
///
/// Returns the complete settings, or the fields that are still missing.
/// No I/O happens here; asking the user is the caller's business.
pub fn resolve_missing(
    config: PartialConfig,
    provided: &[(ConfigField, String)],
) -> Result<Config, Vec<ConfigField>> {
    let mut merged = config;
    for (field, value) in provided {
        if !value.trim().is_empty() {
            merged.set(*field, value.trim());
        }
    }

    let missing = merged.missing();
    if !missing.is_empty() {
        return Err(missing);
    }

    Ok(Config {
        subdomain: merged.subdomain.unwrap_or_default(),
        username: merged.username.unwrap_or_default(),
        password: merged.password.unwrap_or_default(),
        translations_file: merged.translations_file.unwrap_or_default(),
        base_url: merged.base_url,
        log_level: merged.log_level.unwrap_or_default(),
    })
}

impl Config {
    /// Required settings left blank, in prompt order
    pub fn missing_fields(&self) -> Vec<ConfigField> {
        ConfigField::ALL
            .iter()
            .copied()
            .filter(|field| {
                let value = match field {
                    ConfigField::Subdomain => &self.subdomain,
                    ConfigField::Username => &self.username,
                    ConfigField::Password => &self.password,
                    ConfigField::TranslationsFile => &self.translations_file,
                };
                value.trim().is_empty()
            })
            .collect()
    }

    /// Validate the configuration and normalise the subdomain
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.subdomain = normalize_subdomain(&self.subdomain);

        let pattern = Regex::new(r"(?i)^[a-z0-9][a-z0-9-]*$").map_err(|e| ConfigError::Invalid {
            field: ConfigField::Subdomain.label().to_string(),
            message: e.to_string(),
        })?;
        if !pattern.is_match(&self.subdomain) {
            return Err(ConfigError::Invalid {
                field: ConfigField::Subdomain.label().to_string(),
                message: format!("'{}' is not a valid subdomain", self.subdomain),
            });
        }

        if let Some(base_url) = &self.base_url {
            let parsed = Url::parse(base_url).map_err(|e| ConfigError::Invalid {
                field: "base_url".to_string(),
                message: e.to_string(),
            })?;
            if parsed.cannot_be_a_base() {
                return Err(ConfigError::Invalid {
                    field: "base_url".to_string(),
                    message: format!("'{}' cannot be used as a base URL", base_url),
                });
            }
        }

        Ok(self)
    }

    /// Root URL of the instance API host
    pub fn instance_url(&self) -> String {
        match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}.zendesk.com", self.subdomain),
        }
    }
}

// Accepts "acme", "acme.zendesk.com" or "https://acme.zendesk.com/"
fn normalize_subdomain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let host = without_scheme.trim_end_matches('/');
    host.strip_suffix(".zendesk.com").unwrap_or(host).to_string()
}
