/*!
 * Access to the remote ticketing platform.
 *
 * This module contains everything that touches the wire:
 * - `client`: reqwest-backed transport used by the binary
 * - `mock`: scripted transport for tests
 * - `wire`: JSON envelopes exchanged with the API
 * - `classify`: ordered rules that turn failed responses into causes
 */

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Debug;
use thiserror::Error;

/// Locale listing endpoint, unauthenticated
pub const LOCALES_PATH: &str = "/api/v2/locales";

/// Dynamic content collection endpoint
pub const DYNAMIC_CONTENT_ITEMS_PATH: &str = "/api/v2/dynamic_content/items";

/// A response that made it back from the server, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status code with its reason phrase, e.g. `404 Not Found`
    pub fn status_line(&self) -> String {
        match reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }
}

/// The request never produced a response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Agent credentials for authenticated requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header: `Basic base64(username:password)`
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Common trait for talking to one instance
///
/// Implementations only move bytes. Interpreting statuses and bodies is
/// left to the callers so the rules can be tested without a network.
#[async_trait]
pub trait ZendeskTransport: Send + Sync + Debug {
    /// Unauthenticated GET of `path` relative to the instance root
    async fn get(&self, path: &str) -> Result<HttpResponse, TransportError>;

    /// Authenticated JSON POST of `body` to `path`
    async fn post_json(
        &self,
        path: &str,
        body: Vec<u8>,
        credentials: &Credentials,
    ) -> Result<HttpResponse, TransportError>;
}

pub mod classify;
pub mod client;
pub mod mock;
pub mod wire;
