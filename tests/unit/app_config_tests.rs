/*!
 * Tests for settings resolution and validation
 */

use dyncontent_uploader::app_config::{ConfigField, LogLevel, PartialConfig, resolve_missing};
use dyncontent_uploader::errors::ConfigError;

use crate::common;

fn full_partial() -> PartialConfig {
    PartialConfig {
        subdomain: Some("acme".to_string()),
        username: Some("agent@acme.com".to_string()),
        password: Some("s3cret".to_string()),
        translations_file: Some("translations.csv".to_string()),
        base_url: None,
        log_level: None,
    }
}

#[test]
fn test_resolveMissing_withAllFields_shouldBuildConfig() {
    let config = resolve_missing(full_partial(), &[]).expect("all fields present");

    assert_eq!(config.subdomain, "acme");
    assert_eq!(config.username, "agent@acme.com");
    assert_eq!(config.password, "s3cret");
    assert_eq!(config.translations_file, "translations.csv");
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_resolveMissing_withGaps_shouldListMissingInPromptOrder() {
    let partial = PartialConfig {
        username: Some("agent@acme.com".to_string()),
        ..Default::default()
    };

    let missing = resolve_missing(partial, &[]).unwrap_err();

    assert_eq!(
        missing,
        vec![
            ConfigField::Subdomain,
            ConfigField::Password,
            ConfigField::TranslationsFile
        ]
    );
}

#[test]
fn test_resolveMissing_withProvidedAnswers_shouldFillGaps() {
    let partial = PartialConfig {
        password: None,
        ..full_partial()
    };
    let provided = vec![(ConfigField::Password, "  typed  ".to_string())];

    let config = resolve_missing(partial, &provided).expect("gap filled");

    assert_eq!(config.password, "typed");
}

#[test]
fn test_resolveMissing_withBlankAnswer_shouldStayMissing() {
    let partial = PartialConfig {
        subdomain: Some("   ".to_string()),
        ..full_partial()
    };
    let provided = vec![(ConfigField::Subdomain, "".to_string())];

    let missing = resolve_missing(partial, &provided).unwrap_err();

    assert_eq!(missing, vec![ConfigField::Subdomain]);
}

#[test]
fn test_merge_withOverlay_shouldPreferOverlayValues() {
    let base = full_partial();
    let overlay = PartialConfig {
        subdomain: Some("other".to_string()),
        log_level: Some(LogLevel::Debug),
        ..Default::default()
    };

    let merged = base.merge(overlay);

    assert_eq!(merged.subdomain.as_deref(), Some("other"));
    assert_eq!(merged.username.as_deref(), Some("agent@acme.com"));
    assert_eq!(merged.log_level, Some(LogLevel::Debug));
}

#[test]
fn test_fromFile_withCamelCaseKey_shouldReadTranslationsFile() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "settings.json",
        r#"{"subdomain":"acme","username":"a@b.c","translationsFile":"t.csv","log_level":"warn"}"#,
    )
    .unwrap();

    let partial = PartialConfig::from_file(&path).expect("valid settings file");

    assert_eq!(partial.translations_file.as_deref(), Some("t.csv"));
    assert_eq!(partial.log_level, Some(LogLevel::Warn));
    assert_eq!(partial.missing(), vec![ConfigField::Password]);
}

#[test]
fn test_fromFile_withSnakeCaseKey_shouldAcceptAlias() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "settings.json",
        r#"{"translations_file":"t.csv"}"#,
    )
    .unwrap();

    let partial = PartialConfig::from_file(&path).unwrap();

    assert_eq!(partial.translations_file.as_deref(), Some("t.csv"));
}

#[test]
fn test_fromFile_withYamlSettings_shouldReadAllKeys() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "config.yml",
        "subdomain: acme\nusername: agent@acme.com\npassword: s3cret\ntranslationsFile: translations.csv\nlog_level: debug\n",
    )
    .unwrap();

    let partial = PartialConfig::from_file(&path).expect("valid YAML settings");

    assert_eq!(partial.subdomain.as_deref(), Some("acme"));
    assert_eq!(partial.username.as_deref(), Some("agent@acme.com"));
    assert_eq!(partial.password.as_deref(), Some("s3cret"));
    assert_eq!(partial.translations_file.as_deref(), Some("translations.csv"));
    assert_eq!(partial.log_level, Some(LogLevel::Debug));
    assert!(partial.missing().is_empty());
}

#[test]
fn test_fromFile_withPartialYaml_shouldLeaveRestMissing() {
    let dir = common::create_temp_dir().unwrap();
    let path =
        common::create_test_file(dir.path(), "config.yaml", "subdomain: acme\n").unwrap();

    let partial = PartialConfig::from_file(&path).unwrap();

    assert_eq!(
        partial.missing(),
        vec![
            ConfigField::Username,
            ConfigField::Password,
            ConfigField::TranslationsFile
        ]
    );
}

#[test]
fn test_fromFile_withEmptyYaml_shouldReturnNoSettings() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "config.yml", "\n").unwrap();

    let partial = PartialConfig::from_file(&path).unwrap();

    assert_eq!(partial, PartialConfig::default());
}

#[test]
fn test_fromFile_withMalformedYaml_shouldReturnFileError() {
    let dir = common::create_temp_dir().unwrap();
    let path =
        common::create_test_file(dir.path(), "config.yml", "subdomain: [acme\n").unwrap();

    let result = PartialConfig::from_file(&path);

    assert!(matches!(result, Err(ConfigError::File { .. })));
}

#[test]
fn test_fromFile_withMissingFile_shouldReturnFileError() {
    let dir = common::create_temp_dir().unwrap();

    let result = PartialConfig::from_file(dir.path().join("nope.json"));

    assert!(matches!(result, Err(ConfigError::File { .. })));
}

#[test]
fn test_fromFile_withInvalidJson_shouldReturnFileError() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "settings.json", "subdomain: acme").unwrap();

    let result = PartialConfig::from_file(&path);

    assert!(matches!(result, Err(ConfigError::File { .. })));
}

#[test]
fn test_missingFields_withBlankValues_shouldListThemInPromptOrder() {
    let mut config = common::sample_config("t.csv");
    config.username = " ".to_string();
    config.translations_file = String::new();

    assert_eq!(
        config.missing_fields(),
        vec![ConfigField::Username, ConfigField::TranslationsFile]
    );
    assert!(common::sample_config("t.csv").missing_fields().is_empty());
}

#[test]
fn test_validate_withPastedUrl_shouldNormalizeSubdomain() {
    let partial = PartialConfig {
        subdomain: Some("https://acme.zendesk.com/".to_string()),
        ..full_partial()
    };

    let config = resolve_missing(partial, &[]).unwrap().validate().unwrap();

    assert_eq!(config.subdomain, "acme");
    assert_eq!(config.instance_url(), "https://acme.zendesk.com");
}

#[test]
fn test_validate_withInvalidSubdomain_shouldReject() {
    let partial = PartialConfig {
        subdomain: Some("acme corp".to_string()),
        ..full_partial()
    };

    let result = resolve_missing(partial, &[]).unwrap().validate();

    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_validate_withBaseUrl_shouldUseItAsInstanceRoot() {
    let partial = PartialConfig {
        base_url: Some("http://localhost:8080/".to_string()),
        ..full_partial()
    };

    let config = resolve_missing(partial, &[]).unwrap().validate().unwrap();

    assert_eq!(config.instance_url(), "http://localhost:8080");
}

#[test]
fn test_validate_withMalformedBaseUrl_shouldReject() {
    let partial = PartialConfig {
        base_url: Some("not a url".to_string()),
        ..full_partial()
    };

    let result = resolve_missing(partial, &[]).unwrap().validate();

    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}
