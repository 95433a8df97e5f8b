/*!
 * Classification of failed dynamic content uploads.
 *
 * The API reports different causes with different body shapes, so the
 * cause is recovered from the status code and well-known body fragments.
 * Rules are checked top to bottom and the first match wins.
 */

use crate::errors::UploadError;

use super::HttpResponse;
use super::wire::ErrorBody;

/// Causes a failed upload can be attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    InstanceNotFound,
    DuplicateName,
    DuplicatePlaceholder,
    InvalidLocale,
    Unclassified,
}

/// What a rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Exact HTTP status code
    Status(u16),
    /// Substring of the raw response body
    BodyContains(&'static str),
}

impl Matcher {
    pub fn matches(&self, status: u16, body: &str) -> bool {
        match self {
            Self::Status(code) => *code == status,
            Self::BodyContains(fragment) => body.contains(fragment),
        }
    }
}

/// One entry of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub matcher: Matcher,
    pub kind: FailureKind,
}

/// Body fragment for an item name that already exists
pub const DUPLICATE_TITLE_MARKER: &str = "Title: has already been taken";

/// Body fragment for a placeholder that already exists
pub const DUPLICATE_PLACEHOLDER_MARKER: &str = "}} is already in use";

/// Body fragment for a variant locale the instance does not have
pub const INVALID_LOCALE_MARKER: &str = "Translation locale invalid locale";

/// Rules in precedence order
pub const RULES: &[Rule] = &[
    Rule {
        matcher: Matcher::Status(401),
        kind: FailureKind::Authentication,
    },
    Rule {
        matcher: Matcher::Status(404),
        kind: FailureKind::InstanceNotFound,
    },
    Rule {
        matcher: Matcher::BodyContains(DUPLICATE_TITLE_MARKER),
        kind: FailureKind::DuplicateName,
    },
    Rule {
        matcher: Matcher::BodyContains(DUPLICATE_PLACEHOLDER_MARKER),
        kind: FailureKind::DuplicatePlaceholder,
    },
    Rule {
        matcher: Matcher::BodyContains(INVALID_LOCALE_MARKER),
        kind: FailureKind::InvalidLocale,
    },
];

/// First matching rule in `rules`, `Unclassified` if none match
pub fn classify_with(rules: &[Rule], status: u16, body: &str) -> FailureKind {
    rules
        .iter()
        .find(|rule| rule.matcher.matches(status, body))
        .map(|rule| rule.kind)
        .unwrap_or(FailureKind::Unclassified)
}

/// Classify against the built-in rule table
pub fn classify(status: u16, body: &str) -> FailureKind {
    classify_with(RULES, status, body)
}

/// Turn a failed response into the error reported for the item
pub fn upload_error(response: &HttpResponse, subdomain: &str) -> UploadError {
    let status = response.status_line();
    match classify(response.status, &response.body) {
        FailureKind::Authentication => UploadError::Authentication {
            status,
            message: ErrorBody::parse(&response.body).error_message(),
        },
        FailureKind::InstanceNotFound => UploadError::InstanceNotFound {
            status,
            subdomain: subdomain.to_string(),
        },
        FailureKind::DuplicateName => UploadError::DuplicateName { status },
        FailureKind::DuplicatePlaceholder => UploadError::DuplicatePlaceholder { status },
        FailureKind::InvalidLocale => UploadError::InvalidLocale { status },
        FailureKind::Unclassified => UploadError::Unclassified {
            status,
            body: response.body.clone(),
        },
    }
}
