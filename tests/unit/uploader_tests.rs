/*!
 * Tests for payload building and upload failure classification
 */

use dyncontent_uploader::errors::UploadError;
use dyncontent_uploader::table::{TranslationRecord, TranslationTableParser};
use dyncontent_uploader::uploader::{ContentUploader, build_payload};
use dyncontent_uploader::zendesk::classify::{
    DUPLICATE_PLACEHOLDER_MARKER, DUPLICATE_TITLE_MARKER, FailureKind, INVALID_LOCALE_MARKER,
    classify,
};
use dyncontent_uploader::zendesk::mock::MockTransport;
use dyncontent_uploader::zendesk::wire::DynamicContentEnvelope;
use dyncontent_uploader::zendesk::{Credentials, DYNAMIC_CONTENT_ITEMS_PATH};

use crate::common;

fn greeting() -> TranslationRecord {
    let directory = common::sample_directory();
    TranslationTableParser::new(&directory)
        .parse_reader("name,en-us,fr\nGreeting,Hello,Bonjour\n".as_bytes())
        .unwrap()
        .records
        .remove(0)
}

fn credentials() -> Credentials {
    Credentials::new("agent@acme.com", "s3cret")
}

#[test]
fn test_buildPayload_withGreeting_shouldMatchWireFormat() {
    let json = serde_json::to_string(&build_payload(&greeting())).unwrap();

    assert_eq!(
        json,
        r#"{"item":{"name":"Greeting","locale_id":1,"variants":[{"locale_id":1,"default":true,"content":"Hello"},{"locale_id":2,"default":false,"content":"Bonjour"}]}}"#
    );
}

#[test]
fn test_buildPayload_decodedAgain_shouldKeepNameLocaleAndVariantOrder() {
    let record = greeting();
    let json = serde_json::to_string(&build_payload(&record)).unwrap();

    let decoded: DynamicContentEnvelope = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded.item.name, record.name);
    assert_eq!(Some(decoded.item.locale_id), record.default_remote_locale_id);
    let variants: Vec<(u64, bool, &str)> = decoded
        .item
        .variants
        .iter()
        .map(|v| (v.locale_id, v.default, v.content.as_str()))
        .collect();
    assert_eq!(variants, vec![(1, true, "Hello"), (2, false, "Bonjour")]);
}

#[test]
fn test_buildPayload_withUnmappedLocale_shouldSendZero() {
    let directory = common::sample_directory();
    let record = TranslationTableParser::new(&directory)
        .parse_reader("name,de,fr\nGreeting,Hallo,Bonjour\n".as_bytes())
        .unwrap()
        .records
        .remove(0);

    let payload = build_payload(&record);

    assert_eq!(payload.item.locale_id, 0);
    assert_eq!(payload.item.variants[0].locale_id, 0);
    assert_eq!(payload.item.variants[1].locale_id, 2);
}

#[test]
fn test_credentials_basicAuthHeader_shouldEncodeUserAndPassword() {
    assert_eq!(
        credentials().basic_auth_header(),
        "Basic YWdlbnRAYWNtZS5jb206czNjcmV0"
    );
    assert!(!format!("{:?}", credentials()).contains("s3cret"));
}

#[test]
fn test_classify_withDuplicateTitleAndInvalidLocale_shouldPreferDuplicateTitle() {
    let body = format!(
        r#"{{"details":{{"base":["{}","{}"]}}}}"#,
        INVALID_LOCALE_MARKER, DUPLICATE_TITLE_MARKER
    );
    assert_eq!(classify(422, &body), FailureKind::DuplicateName);
}

#[test]
fn test_classify_withPlaceholderAndInvalidLocale_shouldPreferPlaceholder() {
    let body = format!("{} {}", INVALID_LOCALE_MARKER, DUPLICATE_PLACEHOLDER_MARKER);
    assert_eq!(classify(422, &body), FailureKind::DuplicatePlaceholder);
}

#[tokio::test]
async fn test_upload_withSuccess_shouldPostAuthenticatedJson() {
    let transport = MockTransport::new().with_post_response(201, r#"{"item":{"id":7}}"#);
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    uploader.upload(&greeting()).await.expect("created");

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].path, DYNAMIC_CONTENT_ITEMS_PATH);
    assert_eq!(
        calls[0].authorization.as_deref(),
        Some("Basic YWdlbnRAYWNtZS5jb206czNjcmV0")
    );
    assert!(calls[0].body.as_deref().unwrap_or_default().starts_with(r#"{"item":{"name":"Greeting""#));
}

#[tokio::test]
async fn test_upload_with401_shouldReturnAuthenticationMessage() {
    let transport =
        MockTransport::new().with_post_response(401, r#"{"error":"Couldn't authenticate you"}"#);
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    let error = uploader.upload(&greeting()).await.unwrap_err();

    assert_eq!(
        error,
        UploadError::Authentication {
            status: "401 Unauthorized".to_string(),
            message: "Couldn't authenticate you".to_string(),
        }
    );
}

#[tokio::test]
async fn test_upload_with404_shouldNameSubdomain() {
    let transport = MockTransport::new().with_post_response(404, "Not Found");
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    let error = uploader.upload(&greeting()).await.unwrap_err();

    match &error {
        UploadError::InstanceNotFound { subdomain, .. } => assert_eq!(subdomain, "acme"),
        other => panic!("Unexpected error: {:?}", other),
    }
    assert!(error.to_string().contains("acme.zendesk.com"));
}

#[tokio::test]
async fn test_upload_withDuplicateTitle_shouldReturnDuplicateName() {
    let body = r#"{"error":"RecordInvalid","description":"Record validation errors","details":{"name":[{"description":"Title: has already been taken"}]}}"#;
    let transport = MockTransport::new().with_post_response(422, body);
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    let error = uploader.upload(&greeting()).await.unwrap_err();

    assert!(matches!(error, UploadError::DuplicateName { .. }));
    assert!(error.to_string().starts_with("422 Unprocessable Entity"));
}

#[tokio::test]
async fn test_upload_withDuplicatePlaceholder_shouldReturnDuplicatePlaceholder() {
    let body = r#"{"details":{"placeholder":[{"description":"Placeholder: {{dc.greeting}} is already in use"}]}}"#;
    let transport = MockTransport::new().with_post_response(422, body);
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    let error = uploader.upload(&greeting()).await.unwrap_err();

    assert!(matches!(error, UploadError::DuplicatePlaceholder { .. }));
}

#[tokio::test]
async fn test_upload_withInvalidLocale_shouldReturnInvalidLocale() {
    let body = r#"{"details":{"base":[{"description":"Translation locale invalid locale"}]}}"#;
    let transport = MockTransport::new().with_post_response(422, body);
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    let error = uploader.upload(&greeting()).await.unwrap_err();

    assert!(matches!(error, UploadError::InvalidLocale { .. }));
}

#[tokio::test]
async fn test_upload_withUnknownFailure_shouldCarryRawBody() {
    let transport = MockTransport::new().with_post_response(500, "upstream exploded");
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    let error = uploader.upload(&greeting()).await.unwrap_err();

    assert_eq!(
        error,
        UploadError::Unclassified {
            status: "500 Internal Server Error".to_string(),
            body: "upstream exploded".to_string(),
        }
    );
}

#[tokio::test]
async fn test_upload_withTransportFailure_shouldReturnConnectivity() {
    let transport = MockTransport::new().with_post_failure("connection reset");
    let uploader = ContentUploader::new(&transport, credentials(), "acme");

    let error = uploader.upload(&greeting()).await.unwrap_err();

    assert_eq!(error, UploadError::Connectivity("connection reset".to_string()));
}
