use log::debug;
use std::collections::HashMap;

use crate::errors::ApiError;
use crate::zendesk::wire::LocalesEnvelope;
use crate::zendesk::{LOCALES_PATH, ZendeskTransport};

// @module: Installed locales of one instance

/// A locale installed on the instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Locale code, e.g. `en-us`
    pub code: String,
    /// Numeric identifier used by the API
    pub remote_id: u64,
}

/// Locale codes and their remote ids, fetched once per run
#[derive(Debug, Clone, Default)]
pub struct LocaleDirectory {
    locales: Vec<Locale>,
    by_code: HashMap<String, usize>,
    skipped: Vec<Locale>,
}

impl LocaleDirectory {
    /// Build a directory, keeping the first entry for a repeated code
    pub fn from_locales(locales: impl IntoIterator<Item = Locale>) -> Self {
        let mut directory = Self::default();
        for locale in locales {
            if directory.by_code.contains_key(&locale.code) {
                directory.skipped.push(locale);
                continue;
            }
            directory
                .by_code
                .insert(locale.code.clone(), directory.locales.len());
            directory.locales.push(locale);
        }
        directory
    }

    /// Decode the body of the locale listing endpoint
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        let envelope: LocalesEnvelope =
            serde_json::from_str(body).map_err(|e| ApiError::Format(e.to_string()))?;

        Ok(Self::from_locales(envelope.locales.into_iter().map(|entry| Locale {
            code: entry.locale,
            remote_id: entry.id,
        })))
    }

    /// Fetch the installed locales of the instance behind `transport`.
    ///
    /// Single attempt. A non-success status means the instance does not
    /// exist or refused us; the caller decides whether that is fatal.
    pub async fn fetch(transport: &dyn ZendeskTransport) -> Result<Self, ApiError> {
        let response = transport
            .get(LOCALES_PATH)
            .await
            .map_err(|e| ApiError::Connectivity(e.to_string()))?;

        if !response.is_success() {
            return Err(ApiError::Upstream {
                status_code: response.status,
                message: response.status_line(),
            });
        }

        let directory = Self::from_json(&response.body)?;
        debug!("Instance has {} locale(s) installed", directory.len());
        Ok(directory)
    }

    /// Exact-match lookup by code
    pub fn lookup(&self, code: &str) -> Option<&Locale> {
        self.by_code.get(code).map(|&i| &self.locales[i])
    }

    /// Later entries for a code that was already listed, in listing order
    pub fn skipped_duplicates(&self) -> &[Locale] {
        &self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}
