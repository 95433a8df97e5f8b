use log::debug;

use crate::errors::UploadError;
use crate::table::{TranslationRecord, Variant};
use crate::zendesk::classify;
use crate::zendesk::wire::{DynamicContentEnvelope, DynamicContentItem, VariantPayload};
use crate::zendesk::{Credentials, DYNAMIC_CONTENT_ITEMS_PATH, ZendeskTransport};

// @module: Creation of dynamic content items

/// Build the create request body for `record`.
///
/// Unmapped locales are sent as `0`, which the API rejects as an invalid
/// locale.
pub fn build_payload(record: &TranslationRecord) -> DynamicContentEnvelope {
    DynamicContentEnvelope {
        item: DynamicContentItem {
            name: record.name.clone(),
            locale_id: record.default_remote_locale_id.unwrap_or(0),
            variants: record.variants.iter().map(variant_payload).collect(),
        },
    }
}

fn variant_payload(variant: &Variant) -> VariantPayload {
    VariantPayload {
        locale_id: variant.remote_locale_id.unwrap_or(0),
        default: variant.is_default,
        content: variant.content.clone(),
    }
}

/// Uploads records to one instance with one set of credentials
#[derive(Debug)]
pub struct ContentUploader<'a> {
    transport: &'a dyn ZendeskTransport,
    credentials: Credentials,
    subdomain: String,
}

impl<'a> ContentUploader<'a> {
    pub fn new(
        transport: &'a dyn ZendeskTransport,
        credentials: Credentials,
        subdomain: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            subdomain: subdomain.into(),
        }
    }

    /// Create `record` as a dynamic content item, classifying any failure
    pub async fn upload(&self, record: &TranslationRecord) -> Result<(), UploadError> {
        let body = serde_json::to_vec(&build_payload(record))
            .map_err(|e| UploadError::Serialization(e.to_string()))?;

        let response = self
            .transport
            .post_json(DYNAMIC_CONTENT_ITEMS_PATH, body, &self.credentials)
            .await
            .map_err(|e| UploadError::Connectivity(e.to_string()))?;

        if !response.is_success() {
            return Err(classify::upload_error(&response, &self.subdomain));
        }

        debug!("Created dynamic content item '{}'", record.name);
        Ok(())
    }
}
