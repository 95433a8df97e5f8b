use async_trait::async_trait;
use log::debug;
use reqwest::{Client, header};

use super::{Credentials, HttpResponse, TransportError, ZendeskTransport};

/// Zendesk client for interacting with one instance's REST API
#[derive(Debug, Clone)]
pub struct ZendeskClient {
    /// HTTP client for API requests
    client: Client,
    /// Instance root, e.g. `https://acme.zendesk.com`
    base_url: String,
}

impl ZendeskClient {
    /// Create a new client rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder().build().unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client for `https://{subdomain}.zendesk.com`
    pub fn for_subdomain(subdomain: &str) -> Self {
        Self::new(format!("https://{}.zendesk.com", subdomain))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("Failed to read response body: {}", e)))?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl ZendeskTransport for ZendeskClient {
    async fn get(&self, path: &str) -> Result<HttpResponse, TransportError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| TransportError(format!("Failed to send request to {}: {}", url, e)))?;

        Self::read(response).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: Vec<u8>,
        credentials: &Credentials,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.url(path);
        debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, credentials.basic_auth_header())
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError(format!("Failed to send request to {}: {}", url, e)))?;

        Self::read(response).await
    }
}
