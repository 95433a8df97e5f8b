/*!
 * Mock transport implementation for testing.
 *
 * Responses are scripted per method and consumed in order. Once a script
 * runs out the mock falls back to a default:
 * - GET answers `200 {"locales":[]}`
 * - POST answers `200 {}`
 *
 * Every call is recorded so tests can assert exact request order.
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::wire::{LocaleEntry, LocalesEnvelope};
use super::{Credentials, HttpResponse, TransportError, ZendeskTransport};

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// `GET` or `POST`
    pub method: &'static str,
    /// Path relative to the instance root
    pub path: String,
    /// Request body for POST calls
    pub body: Option<String>,
    /// `Authorization` header for POST calls
    pub authorization: Option<String>,
}

type Scripted = Result<HttpResponse, TransportError>;

/// Scripted transport for tests
#[derive(Debug, Default)]
pub struct MockTransport {
    get_script: Mutex<VecDeque<Scripted>>,
    post_script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next GET with a locale listing
    pub fn with_locales(self, locales: &[(&str, u64)]) -> Self {
        let envelope = LocalesEnvelope {
            locales: locales
                .iter()
                .map(|(code, id)| LocaleEntry {
                    locale: code.to_string(),
                    id: *id,
                })
                .collect(),
        };
        let body = serde_json::to_string(&envelope).unwrap_or_default();
        self.with_get_response(200, body)
    }

    /// Answer the next GET with `status` and `body`
    pub fn with_get_response(self, status: u16, body: impl Into<String>) -> Self {
        Self::push(&self.get_script, Ok(HttpResponse::new(status, body)));
        self
    }

    /// Fail the next GET before any response
    pub fn with_get_failure(self, message: impl Into<String>) -> Self {
        Self::push(&self.get_script, Err(TransportError(message.into())));
        self
    }

    /// Answer the next POST with `status` and `body`
    pub fn with_post_response(self, status: u16, body: impl Into<String>) -> Self {
        Self::push(&self.post_script, Ok(HttpResponse::new(status, body)));
        self
    }

    /// Fail the next POST before any response
    pub fn with_post_failure(self, message: impl Into<String>) -> Self {
        Self::push(&self.post_script, Err(TransportError(message.into())));
        self
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Bodies of all POST calls in order
    pub fn post_bodies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == "POST")
            .filter_map(|c| c.body)
            .collect()
    }

    fn push(script: &Mutex<VecDeque<Scripted>>, entry: Scripted) {
        script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(entry);
    }

    fn next(script: &Mutex<VecDeque<Scripted>>) -> Option<Scripted> {
        script.lock().unwrap_or_else(|e| e.into_inner()).pop_front()
    }

    fn record(&self, call: RecordedCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl ZendeskTransport for MockTransport {
    async fn get(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.record(RecordedCall {
            method: "GET",
            path: path.to_string(),
            body: None,
            authorization: None,
        });

        Self::next(&self.get_script).unwrap_or_else(|| Ok(HttpResponse::new(200, r#"{"locales":[]}"#)))
    }

    async fn post_json(
        &self,
        path: &str,
        body: Vec<u8>,
        credentials: &Credentials,
    ) -> Result<HttpResponse, TransportError> {
        self.record(RecordedCall {
            method: "POST",
            path: path.to_string(),
            body: Some(String::from_utf8_lossy(&body).into_owned()),
            authorization: Some(credentials.basic_auth_header()),
        });

        Self::next(&self.post_script).unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }
}
