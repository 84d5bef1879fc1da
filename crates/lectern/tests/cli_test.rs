//! Integration tests for the `lectern` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a server; the API-backed cases talk to a wiremock instance.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `lectern` binary with env isolation.
///
/// Clears all `LECTERN_*` env vars and points config and data directories
/// at a nonexistent path so tests never touch the user's real files.
fn lectern_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lectern");
    cmd.env("HOME", "/tmp/lectern-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/lectern-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/lectern-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("LECTERN_PROFILE")
        .env_remove("LECTERN_BASE_URL")
        .env_remove("LECTERN_CSRF_TOKEN")
        .env_remove("LECTERN_OUTPUT")
        .env_remove("LECTERN_INSECURE")
        .env_remove("LECTERN_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn widgets_payload() -> serde_json::Value {
    json!({
        "data": {
            "widgets": [
                {"id": "hero", "label": "Hero", "enabled": true, "settings": {"autoplay": true}},
                {"id": "events", "label": "Events", "enabled": false, "settings": {"limit": 3}}
            ],
            "available_widgets": [
                {"id": "hero", "label": "Hero", "enabled": true}
            ]
        }
    })
}

// The binary blocks the calling thread; the mock server needs another worker.
async fn run(cmd: assert_cmd::Command) -> std::process::Output {
    let mut cmd = cmd;
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = lectern_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    lectern_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("church platform")
            .and(predicate::str::contains("announcements"))
            .and(predicate::str::contains("widgets"))
            .and(predicate::str::contains("categories")),
    );
}

#[test]
fn test_version_flag() {
    lectern_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lectern"));
}

#[test]
fn test_completions_bash() {
    lectern_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    lectern_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = lectern_cmd().arg("hymnals").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("hymnals"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_list_without_base_url() {
    lectern_cmd()
        .args(["announcements", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("base URL"));
}

#[test]
fn test_unknown_profile() {
    lectern_cmd()
        .args(["--profile", "staging", "sermons", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_invalid_category_type() {
    lectern_cmd()
        .args([
            "--base-url",
            "http://127.0.0.1:9/api/admin",
            "categories",
            "--type",
            "hymn",
            "tree",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("hymn"));
}

#[test]
fn test_config_show_no_config() {
    // Falls back to the default config when no file exists.
    lectern_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_session_show_signed_out() {
    lectern_cmd()
        .args(["session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_announcements_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/announcements"))
        .and(query_param("page", "1"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "title": "Welcome", "type": "general", "priority": 2, "is_active": 1}
            ],
            "current_page": 1, "last_page": 1, "from": 1, "to": 1, "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = lectern_cmd();
    cmd.args([
        "announcements",
        "list",
        "--filter",
        "status=active",
        "--base-url",
        &format!("{}/api/admin", server.uri()),
        "-o",
        "json-compact",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["title"], "Welcome");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_record_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/sermons/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&server)
        .await;

    let mut cmd = lectern_cmd();
    cmd.args([
        "--base-url",
        &format!("{}/api/admin", server.uri()),
        "sermons",
        "show",
        "99",
    ]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("sermons list"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_widgets_toggle_dry_run_does_not_publish() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/widgets-config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widgets_payload()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/widgets-config"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = lectern_cmd();
    cmd.args([
        "--base-url",
        &format!("{}/api/admin", server.uri()),
        "-o",
        "json-compact",
        "widgets",
        "toggle",
        "1",
        "--dry-run",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let layout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(layout[1]["id"], "events");
    assert_eq!(layout[1]["enabled"], true);
    assert!(combined_output(&output).contains("Dry run"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_widgets_move_publishes_new_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/widgets-config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widgets_payload()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/widgets-config"))
        .and(body_json(json!({
            "widgets": [
                {
                    "id": "events", "label": "Events", "icon": "",
                    "enabled": false, "settings": {"limit": 3}
                },
                {
                    "id": "hero", "label": "Hero", "icon": "",
                    "enabled": true, "settings": {"autoplay": true}
                }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Homepage saved"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = lectern_cmd();
    cmd.args([
        "--base-url",
        &format!("{}/api/admin", server.uri()),
        "widgets",
        "move",
        "1",
        "0",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_widgets_reset_requires_yes_without_tty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/widgets-config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widgets_payload()))
        .mount(&server)
        .await;

    let mut cmd = lectern_cmd();
    cmd.args([
        "--base-url",
        &format!("{}/api/admin", server.uri()),
        "widgets",
        "reset",
    ]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("--yes"));
}
