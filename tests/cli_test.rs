//! CLI integration tests for the wdpro-facilities binary.

#![cfg(feature = "remote")]

use assert_cmd::Command;
use mockito::{Mock, Server, ServerGuard};
use predicates::prelude::*;
use rusqlite::Connection;
use serde_json::{json, Value};
use tempfile::TempDir;

fn cmd(server: &ServerGuard) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wdpro-facilities"));
    cmd.arg("--base-url").arg(server.url());
    cmd
}

fn mock_json(server: &mut ServerGuard, path: &str, body: &Value) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create()
}

// Helper to create a sync database with one cached attraction document
fn write_cache(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sync.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE facilities (id TEXT PRIMARY KEY, doc_id TEXT, destination_code TEXT);
         CREATE TABLE sync (id TEXT PRIMARY KEY, body TEXT);",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO facilities VALUES (?1, ?2, ?3)",
        [
            "80010208",
            "wdw.facilities.1_0.en_us.attraction.80010208;entityType=Attraction",
            "wdw",
        ],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO facilities VALUES (?1, ?2, ?3)",
        [
            "80007798",
            "wdw.facilities.1_0.en_us.destination.80007798;entityType=destination",
            "wdw",
        ],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO sync VALUES (?1, ?2)",
        [
            "wdw.facilities.1_0.en_us.attraction.80010208;entityType=Attraction",
            r#"{"ancestorThemeParkId":"80007944;entityType=theme-park","ancestorDestinationId":"80007798;entityType=destination"}"#,
        ],
    )
    .unwrap();
    path
}

fn attraction_record() -> Value {
    json!({
        "id": "80010208",
        "name": "Space Mountain\u{00ae}",
        "type": "Attraction",
        "links": {}
    })
}

mod show_command {
    use super::*;

    #[test]
    fn show_without_cache() {
        let mut server = Server::new();
        let _m = mock_json(
            &mut server,
            "/facility-service/attractions/80010208",
            &attraction_record(),
        );

        cmd(&server)
            .args(["show", "attraction", "80010208"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""name":"Space Mountain""#))
            .stdout(predicate::str::contains(r#""parkId":null"#))
            .stdout(predicate::str::contains(r#""docId":null"#));
    }

    #[test]
    fn show_with_sqlite_cache() {
        let dir = TempDir::new().unwrap();
        let cache = write_cache(&dir);
        let mut server = Server::new();
        let _m = mock_json(
            &mut server,
            "/facility-service/attractions/80010208",
            &attraction_record(),
        );

        cmd(&server)
            .args(["--cache", cache.to_str().unwrap()])
            .args(["show", "attractions", "80010208"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""parkId":"80007944""#))
            .stdout(predicate::str::contains(r#""destinationId":"80007798""#))
            .stdout(predicate::str::contains(r#""destinationCode":"wdw""#));
    }

    #[test]
    fn show_pretty() {
        let mut server = Server::new();
        let _m = mock_json(
            &mut server,
            "/facility-service/attractions/80010208",
            &attraction_record(),
        );

        cmd(&server)
            .args(["show", "attraction", "80010208", "--pretty"])
            .assert()
            .success()
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn show_not_found_exit_code() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/facility-service/characters/0")
            .with_status(404)
            .create();

        cmd(&server)
            .args(["show", "character", "0"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("entity not available: 0"));
    }

    #[test]
    fn show_missing_cache_file() {
        let server = Server::new();

        cmd(&server)
            .args(["--cache", "/nonexistent/sync.db", "show", "character", "1"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("cache database not found"));
    }

    #[test]
    fn show_unknown_kind() {
        let server = Server::new();

        cmd(&server)
            .args(["show", "show", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown entity kind"));
    }
}

mod listing_commands {
    use super::*;

    #[test]
    fn ids_one_per_line() {
        let mut server = Server::new();
        let url = server.url();
        let _m = mock_json(
            &mut server,
            "/facility-service/entertainments",
            &json!({
                "entries": [
                    { "links": { "self": { "href": format!("{}/facility-service/entertainments/100", url) } } },
                    { "links": { "self": { "href": format!("{}/facility-service/entertainments/101", url) } } }
                ]
            }),
        );

        cmd(&server)
            .args(["ids", "entertainment"])
            .assert()
            .success()
            .stdout("100\n101\n");
    }

    #[test]
    fn related_ids_include_unknown_types() {
        let mut server = Server::new();
        let _m = mock_json(
            &mut server,
            "/facility-service/characters/17480",
            &json!({
                "id": "17480",
                "name": "Mickey Mouse",
                "type": "Character",
                "relatedLocations": { "primaryLocations": [
                    { "facilityType": "Show", "links": { "self": { "href": "https://x/shows/1" } } },
                    { "facilityType": "Attraction", "links": { "self": { "href": "https://x/attractions/80010208" } } }
                ] }
            }),
        );

        cmd(&server)
            .args(["related", "character", "17480"])
            .assert()
            .success()
            .stdout("1\tShow\n80010208\tAttraction\n");
    }

    #[test]
    fn events_ids() {
        let mut server = Server::new();
        let _m = mock_json(
            &mut server,
            "/facility-service/characters/17480",
            &json!({
                "id": "17480",
                "name": "Mickey Mouse",
                "type": "Character",
                "associatedEvents": [
                    { "links": { "self": { "href": "https://x/entertainments/100" } } }
                ]
            }),
        );

        cmd(&server)
            .args(["events", "character", "17480"])
            .assert()
            .success()
            .stdout("100\n");
    }

    #[test]
    fn related_resolve_warns_on_unknown_type() {
        let mut server = Server::new();
        let url = server.url();
        let _c = mock_json(
            &mut server,
            "/facility-service/characters/17480",
            &json!({
                "id": "17480",
                "name": "Mickey Mouse",
                "type": "Character",
                "relatedLocations": { "primaryLocations": [
                    { "facilityType": "Show", "links": { "self": { "href": format!("{}/facility-service/shows/1", url) } } },
                    { "facilityType": "Attraction", "links": { "self": { "href": format!("{}/facility-service/attractions/80010208", url) } } }
                ] }
            }),
        );
        let _a = mock_json(
            &mut server,
            "/facility-service/attractions/80010208",
            &attraction_record(),
        );

        cmd(&server)
            .args(["related", "character", "17480", "--resolve"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""name":"Space Mountain""#))
            .stderr(predicate::str::contains("no entity kind for related location type"));
    }
}

mod normalize_command {
    use super::*;

    #[test]
    fn normalize_offline() {
        let server = Server::new();

        cmd(&server)
            .args(["normalize", "  Mickey\u{2019}s PhilharMagic\u{00ae} "])
            .assert()
            .success()
            .stdout("Mickey's PhilharMagic\n");
    }

    #[test]
    fn normalize_ignores_missing_cache() {
        let server = Server::new();

        cmd(&server)
            .arg("--cache")
            .arg("/nonexistent/sync.sqlite")
            .args(["normalize", "Epcot\u{00ae}"])
            .assert()
            .success()
            .stdout("Epcot\n");
    }
}
