//! Integration tests for the `parkdesk` binary.
//!
//! Argument parsing, help, completions and error exits run without a
//! backend; the last section drives the binary against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `parkdesk` with every `PARKDESK_*` variable cleared and config
/// directories pointed at a path that does not exist.
fn parkdesk_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("parkdesk");
    cmd.env("HOME", "/tmp/parkdesk-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/parkdesk-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("PARKDESK_PROFILE")
        .env_remove("PARKDESK_API_URL")
        .env_remove("PARKDESK_TOKEN")
        .env_remove("PARKDESK_OUTPUT")
        .env_remove("PARKDESK_INSECURE")
        .env_remove("PARKDESK_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "statusCode": 200, "error": false, "message": "OK", "data": data })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = parkdesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_main_commands() {
    parkdesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("registrations")
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("vehicles"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn version_flag() {
    parkdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("parkdesk"));
}

#[test]
fn registrations_help_shows_lifecycle_commands() {
    parkdesk_cmd()
        .args(["registrations", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("smart-extend")
                .and(predicate::str::contains("update-months"))
                .and(predicate::str::contains("chain")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn completions_bash() {
    parkdesk_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn completions_zsh() {
    parkdesk_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn invalid_subcommand() {
    let output = parkdesk_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("unrecognized") || text.contains("foobar"), "{text}");
}

#[test]
fn registrations_list_without_config_fails() {
    parkdesk_cmd()
        .args(["registrations", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config").or(predicate::str::contains("profile")));
}

#[test]
fn unknown_profile_is_reported() {
    parkdesk_cmd()
        .args(["--profile", "nope", "users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn search_requires_a_field() {
    let output = parkdesk_cmd()
        .args(["registrations", "search"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_show_without_file_succeeds() {
    parkdesk_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn config_path_prints_toml_path() {
    parkdesk_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn invalid_output_format() {
    let output = parkdesk_cmd()
        .args(["--output", "invalid", "registrations", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("invalid") || text.contains("possible values"), "{text}");
}

// ── Against a mock backend ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn registrations_list_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .and(header("authorization", "Bearer tok-cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "id": 11,
            "bienSoXe": "51A-123.45",
            "soThang": 3,
            "thoiGianBatDau": "2026-01-01T00:00:00.000Z",
            "thoiGianHetHan": "2026-04-01T00:00:00.000Z",
            "soTienThanhToan": 450000,
            "trangThai": "ACTIVE",
            "trangThaiThanhToan": "COMPLETE",
            "lanGiaHan": 0,
            "parentId": null
        }]))))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        parkdesk_cmd()
            .args(["--api-url", &uri, "--token", "tok-cli"])
            .args(["registrations", "list", "-o", "json"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("51A-123.45"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn backend_rejection_exits_nonzero_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "error": true,
            "message": "Không tìm thấy khách hàng"
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        parkdesk_cmd()
            .args(["--api-url", &uri, "--token", "t"])
            .args(["users", "get", "99"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn smart_extend_of_superseded_row_is_refused_without_posting() {
    let server = MockServer::start().await;
    let first = json!({
        "id": 1,
        "bienSoXe": "51A-123.45",
        "soThang": 1,
        "trangThai": "ACTIVE",
        "trangThaiThanhToan": "COMPLETE",
        "lanGiaHan": 0,
        "parentId": null
    });
    let second = json!({
        "id": 2,
        "bienSoXe": "51A-123.45",
        "soThang": 1,
        "trangThai": "PENDING",
        "trangThaiThanhToan": "PENDING",
        "lanGiaHan": 1,
        "parentId": 1
    });
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(first.clone())))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/1/extension-chain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([first, second]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        parkdesk_cmd()
            .args(["--api-url", &uri, "--token", "t"])
            .args(["registrations", "smart-extend", "1", "--months", "1"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}
