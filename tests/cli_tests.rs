//! CLI integration tests against the built binary.

mod harness;
mod support;

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use harness::stub_server::{StubResponse, StubServer};
use harness::temp_db::TempDb;
use predicates::prelude::*;

fn arbscan() -> Command {
    let mut cmd = cargo_bin_cmd!("arbscan");
    cmd.env_remove("COINGECKO_API_KEY")
        .env_remove("TELEGRAM_BOT_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Config file for `db` next to the database, returned as a path string.
fn write_config(db: &TempDb, extra: &str) -> String {
    let path = db.path().with_extension("toml");
    let content = format!(
        "{}{extra}",
        support::config::small_catalog_toml(&db.config_line())
    );
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

#[test]
fn help_lists_commands() {
    arbscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("arbscan"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("opportunities"))
        .stdout(predicate::str::contains("inbox"));
}

#[test]
fn version_prints_name() {
    arbscan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("arbscan"));
}

#[test]
fn unknown_command_fails() {
    arbscan().arg("trade").assert().failure();
}

#[test]
fn config_init_writes_template_then_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf").join("arbscan.toml");
    let path = path.to_str().unwrap();

    arbscan()
        .args(["--config", path, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    arbscan()
        .args(["--config", path, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    arbscan()
        .args(["--config", path, "config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}

#[test]
fn config_validate_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[scanner]\ninterval_secs = 0\n").unwrap();

    arbscan()
        .args(["--config", path.to_str().unwrap(), "config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for interval_secs"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    arbscan()
        .args(["--config", path.to_str().unwrap(), "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn config_show_json_hides_secrets() {
    let db = TempDb::create("cli-show");
    let config = write_config(&db, "");

    arbscan()
        .env("COINGECKO_API_KEY", "super-secret-key")
        .args(["--config", &config, "--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"config.show\""))
        .stdout(predicate::str::contains("\"api_key_set\":true"))
        .stdout(predicate::str::contains("super-secret-key").not());
}

#[test]
fn users_import_then_list() {
    let db = TempDb::create("cli-users");
    let config = write_config(&db, "");
    let users = db.path().with_extension("users.json");
    fs::write(
        &users,
        r#"[
            {"user_id": "alice", "tier": "pro", "min_profit_threshold": "1.5"},
            {"user_id": "bob", "tier": "platinum"}
        ]"#,
    )
    .unwrap();

    arbscan()
        .args(["--config", &config, "users", "import", users.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 user(s)"))
        .stdout(predicate::str::contains("unknown tier 'platinum'"));

    arbscan()
        .args(["--config", &config, "--json", "users", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"user_id\":\"alice\""))
        .stdout(predicate::str::contains("\"user_id\":\"bob\""));
}

#[test]
fn opportunities_empty_database() {
    let db = TempDb::create("cli-opportunities");
    let config = write_config(&db, "");

    arbscan()
        .args(["--config", &config, "opportunities"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active Opportunities"))
        .stdout(predicate::str::contains("(none)"));

    arbscan()
        .args(["--config", &config, "--json", "opportunities"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"opportunities\":[]"));
}

#[test]
fn inbox_for_user_without_notifications() {
    let db = TempDb::create("cli-inbox");
    let config = write_config(&db, "");

    arbscan()
        .args(["--config", &config, "inbox", "alice", "--mark-read", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inbox for alice"))
        .stdout(predicate::str::contains("No unread notification 3 for alice"))
        .stdout(predicate::str::contains("(empty)"));
}

#[test]
fn check_fails_when_price_source_is_unreachable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let db = TempDb::create("cli-check");
    let config = write_config(
        &db,
        &format!(
            "\n[price_source]\nbase_url = \"http://127.0.0.1:{port}\"\nhealth_timeout_ms = 2000\n"
        ),
    );

    arbscan()
        .args(["--config", &config, "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("database"))
        .stderr(predicate::str::contains("price_source"));
}

#[test]
fn scan_against_stub_reports_results() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(StubServer::start());
    server.respond("/ping", vec![StubResponse::ok(r#"{"gecko_says": "(V3) To the Moon!"}"#)]);
    server.respond(
        "/coins/bitcoin/tickers",
        vec![StubResponse::ok(
            r#"{"tickers": [
                {"base": "BTC", "target": "USD", "last": 100.0, "market": {"identifier": "binance"}},
                {"base": "BTC", "target": "USDT", "last": 110.0, "market": {"identifier": "kraken"}}
            ]}"#,
        )],
    );
    let db = TempDb::create("cli-scan");
    let config = write_config(
        &db,
        &format!(
            "\n[price_source]\nbase_url = \"{}\"\nmin_request_interval_ms = 0\n",
            server.base_url()
        ),
    );

    arbscan()
        .args(["--config", &config, "--json", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"completed\""))
        .stdout(predicate::str::contains("\"opportunities_stored\":1"));

    drop(server);
    drop(runtime);
}
