//! JSON shapes fixed by the remote API.

use serde::{Deserialize, Serialize};

/// Response of the locale listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalesEnvelope {
    pub locales: Vec<LocaleEntry>,
}

/// One installed locale. Other fields the API returns are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleEntry {
    pub locale: String,
    pub id: u64,
}

/// Request body for creating a dynamic content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DynamicContentEnvelope {
    pub item: DynamicContentItem,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DynamicContentItem {
    pub name: String,
    /// Locale of the default variant
    pub locale_id: u64,
    pub variants: Vec<VariantPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantPayload {
    /// `0` when the column did not match an installed locale
    pub locale_id: u64,
    pub default: bool,
    pub content: String,
}

/// Error body returned on failed requests.
///
/// `error` is a string for authentication failures and an object for
/// validation failures, so it stays untyped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Decode a failure body, yielding an empty value when it is not JSON
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The `error` field as text
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}
