mod common;

use assert_cmd::Command;
use common::{CannedServer, METADATA_REPLY, SEARCH_REPLY};
use predicates::prelude::*;
use std::path::Path;

/// Nothing listens on the discard port.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn malcat(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("malcat").unwrap();
    cmd.env("MALCAT_CONFIG_DIR", config_dir)
        .env_remove("MALCAT_API_URL")
        .env_remove("MALCAT_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = tempfile::tempdir().unwrap();
    malcat(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("options"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_config_set_then_get() {
    let temp_dir = tempfile::tempdir().unwrap();

    malcat(temp_dir.path())
        .args(["config", "api-url", "http://catalog.lan:5000/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api-url set to"));

    malcat(temp_dir.path())
        .args(["config", "api-url"])
        .assert()
        .success()
        .stdout("http://catalog.lan:5000\n");

    malcat(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("default-limit"))
        .stdout(predicate::str::contains("50"));
}

#[test]
fn test_config_rejects_invalid_values() {
    let temp_dir = tempfile::tempdir().unwrap();

    malcat(temp_dir.path())
        .args(["config", "default-limit", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a positive number"));

    malcat(temp_dir.path())
        .args(["config", "api-url", "ftp://catalog.lan"])
        .assert()
        .failure();
}

#[test]
fn test_search_against_unreachable_backend_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    malcat(temp_dir.path())
        .args(["--api-url", UNREACHABLE, "search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_delete_against_unreachable_backend_reports_failure() {
    let temp_dir = tempfile::tempdir().unwrap();
    malcat(temp_dir.path())
        .args(["--api-url", UNREACHABLE, "delete", "3", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Delete failed"));
}

#[test]
fn test_invalid_score_sends_nothing() {
    let server = CannedServer::start(vec![]);
    let temp_dir = tempfile::tempdir().unwrap();
    malcat(temp_dir.path())
        .args(["--api-url", &server.base_url, "score", "1", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid score"));
    assert!(server.requests().is_empty());
}

#[test]
fn test_search_prints_cards() {
    let server = CannedServer::start(vec![("GET /api/search", 200, SEARCH_REPLY)]);
    let temp_dir = tempfile::tempdir().unwrap();

    malcat(temp_dir.path())
        .args(["--api-url", &server.base_url, "search", "--title", "bebop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cowboy Bebop"))
        .stdout(predicate::str::contains("8.75"))
        .stdout(predicate::str::contains("26 eps"));

    assert_eq!(server.targets(), vec!["GET /api/search?title=bebop&limit=50"]);
}

#[test]
fn test_naked_run_searches_with_configured_limit() {
    let server = CannedServer::start(vec![("GET /api/search", 200, "[]")]);
    let temp_dir = tempfile::tempdir().unwrap();

    malcat(temp_dir.path())
        .args(["config", "default-limit", "10"])
        .assert()
        .success();

    malcat(temp_dir.path())
        .env("MALCAT_API_URL", &server.base_url)
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));

    assert_eq!(server.targets(), vec!["GET /api/search?limit=10"]);
}

#[test]
fn test_options_prints_cascaded_item_types() {
    let server = CannedServer::start(vec![("GET /api/metadata", 200, METADATA_REPLY)]);
    let temp_dir = tempfile::tempdir().unwrap();

    malcat(temp_dir.path())
        .args(["--api-url", &server.base_url, "options", "--medium", "anime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s_item_type"))
        .stdout(predicate::str::contains("TV"))
        .stdout(predicate::str::contains("Manga").not())
        .stdout(predicate::str::contains("Action"));
}

#[test]
fn test_insert_reports_new_id() {
    let server = CannedServer::start(vec![("POST /api/insert/anime", 200, r#"{"entry_id": 12}"#)]);
    let temp_dir = tempfile::tempdir().unwrap();

    malcat(temp_dir.path())
        .args([
            "--api-url",
            &server.base_url,
            "insert",
            "anime",
            "title_name=Akira",
            "genres=1",
            "genres=4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success! ID: 12"));

    let requests = server.requests();
    assert_eq!(requests[0].body, r#"{"title_name":"Akira","genres":["1","4"]}"#);
}

#[test]
fn test_insert_rejects_repeated_single_field() {
    let server = CannedServer::start(vec![("POST /api/insert/anime", 200, r#"{"entry_id": 12}"#)]);
    let temp_dir = tempfile::tempdir().unwrap();

    malcat(temp_dir.path())
        .args([
            "--api-url",
            &server.base_url,
            "insert",
            "anime",
            "title_name=Akira",
            "status_id=1",
            "status_id=2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("status_id takes one value"));

    assert!(server.requests().is_empty());
}
