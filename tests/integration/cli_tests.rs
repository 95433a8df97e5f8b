/*!
 * Exit status of the binary for command lines that never reach the network
 */

use std::process::{Command, Output};

use dyncontent_uploader::errors::{EXIT_PREFLIGHT_FAILURE, EXIT_SUCCESS};

use crate::common;

const SETTINGS_VARS: [&str; 4] = [
    "ZENDESK_SUBDOMAIN",
    "ZENDESK_USERNAME",
    "ZENDESK_PASSWORD",
    "ZENDESK_TRANSLATIONS_FILE",
];

fn run_cli(args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_dyncontent-uploader"));
    for var in SETTINGS_VARS {
        command.env_remove(var);
    }
    command.args(args).output().expect("binary runs")
}

#[test]
fn test_cli_withInvalidLogLevel_shouldExitWithPreflightCode() {
    let output = run_cli(&["--log-level", "bogus", "--no-prompt"]);

    assert_eq!(output.status.code(), Some(EXIT_PREFLIGHT_FAILURE));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bogus"));
}

#[test]
fn test_cli_withUnknownFlag_shouldExitWithPreflightCode() {
    let output = run_cli(&["--no-such-flag"]);

    assert_eq!(output.status.code(), Some(EXIT_PREFLIGHT_FAILURE));
}

#[test]
fn test_cli_withMissingSettings_shouldExitWithPreflightCode() {
    let output = run_cli(&["--no-prompt", "-s", "acme"]);

    assert_eq!(output.status.code(), Some(EXIT_PREFLIGHT_FAILURE));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Username"));
}

#[test]
fn test_cli_withUnreadableSettingsFile_shouldExitWithPreflightCode() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "config.yml", "subdomain: [acme\n").unwrap();
    let path = path.to_string_lossy().to_string();

    let output = run_cli(&["--no-prompt", "-c", path.as_str()]);

    assert_eq!(output.status.code(), Some(EXIT_PREFLIGHT_FAILURE));
}

#[test]
fn test_cli_withHelp_shouldExitZero() {
    let output = run_cli(&["--help"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--strict-locales"));
}

#[test]
fn test_cli_withVersion_shouldExitZero() {
    let output = run_cli(&["--version"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}
