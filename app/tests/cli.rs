use assert_cmd::Command;
use mocks::httptest::{matchers::*, responders::*, Expectation, Server};
use mocks::{api_base, catalog_server};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

// A photocat command pointed at `server`, with HOME in a scratch directory
fn photocat(home: &TempDir, server: &Server) -> Command {
    let mut cmd = Command::cargo_bin("photocat").unwrap();
    cmd.env("HOME", home.path());
    cmd.env_remove("PHOTOCAT_API_BASE_URL");
    cmd.env_remove("PHOTOCAT_GROUPING");
    cmd.args(["--api-url", &api_base(server), "--log-level", "warn"]);
    cmd
}

#[test]
fn photocat_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("photocat")?;
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Browse a photo catalog"));
    Ok(())
}

#[test]
fn photos_root_lists_years() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_get(
        &server,
        "/api/photographs/years/",
        json!([{ "year": 2023, "count": 2 }, { "year": null, "count": 1 }]),
    );

    photocat(&home, &server)
        .arg("photos")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("All\n"))
        .stdout(predicate::str::contains("2023 (2)"))
        .stdout(predicate::str::contains("Unknown (1)"));
}

#[test]
fn photos_day_lists_items_sorted_descending() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/api/photographs/"),
            request::query(url_decoded(contains(("year", "2023")))),
            request::query(url_decoded(contains(("month", "07")))),
            request::query(url_decoded(contains(("day", "05")))),
        ])
        .respond_with(json_encoded(mocks::page(
            vec![
                mocks::photograph(1, Some("2023-07-05T08:00:00Z")),
                mocks::photograph(2, Some("2023-07-05T09:00:00Z")),
            ],
            None,
        ))),
    );

    let output = photocat(&home, &server)
        .args(["photos", "--year", "2023", "--month", "7", "--day", "5", "--desc"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "All > 2023 > 07 > 05");
    assert!(lines[1].trim_start().starts_with('2'));
    assert!(lines[2].trim_start().starts_with('1'));
}

#[test]
fn photos_empty_level_says_nothing_here() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_get(&server, "/api/photographs/", mocks::page(vec![], None));

    photocat(&home, &server)
        .args(["photos", "--unknown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing here"));
}

#[test]
fn photos_server_error_fails() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_status(&server, "GET", "/api/photographs/months/", 500);

    photocat(&home, &server)
        .args(["photos", "--year", "2023"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Internal Server Error"));
}

#[test]
fn month_requires_year() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    photocat(&home, &server)
        .args(["photos", "--month", "7"])
        .assert()
        .failure();
}

#[test]
fn paths_grouped_on_client() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_first_page(
        &server,
        "/api/photo-paths/",
        mocks::page(
            vec![
                mocks::photo_path(1, "/nas/2023/a.jpg"),
                mocks::photo_path(2, "/nas/2023/b.jpg"),
                mocks::photo_path(3, "/nas/cover.jpg"),
            ],
            None,
        ),
    );

    photocat(&home, &server)
        .args(["--grouping", "client", "paths", "/nas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/ > nas"))
        .stdout(predicate::str::contains("2023/ (2)"))
        .stdout(predicate::str::contains("/nas/cover.jpg"));
}

#[test]
fn delete_reports_each_photograph() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api/planned-actions/"),
            request::body(json_decoded(eq(json!({ "action_type": "DELETE", "photograph": 1 })))),
        ])
        .respond_with(status_code(404)),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api/planned-actions/"),
            request::body(json_decoded(eq(json!({ "action_type": "DELETE", "photograph": 2 })))),
        ])
        .respond_with(status_code(204)),
    );

    photocat(&home, &server)
        .args(["photos", "delete", "1", "2", "--keep-going"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 failed: Not Found"))
        .stdout(predicate::str::contains("2 deleted"))
        .stderr(predicate::str::contains("1 of 2 deletions failed"));
}

#[test]
fn hash_prints_computed_value() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_post(
        &server,
        "/api/photographs/7/compute_hash/",
        json!({ "hash": "c0ffee", "status": "success" }),
    );
    mocks::expect_status(&server, "POST", "/api/photographs/8/compute_hash/", 400);

    photocat(&home, &server)
        .args(["photos", "hash", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7 c0ffee"));

    photocat(&home, &server)
        .args(["photos", "hash", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Bad Request"));
}

#[test]
fn albums_list_and_common() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_get(
        &server,
        "/api/albums/",
        mocks::page(vec![mocks::album(1, "Trips", 4), mocks::album(2, "Pets", 1)], None),
    );
    let mut x = mocks::photograph(10, None);
    x["albums"] = json!([1, 2]);
    let mut y = mocks::photograph(11, None);
    y["albums"] = json!([2]);
    mocks::expect_get(&server, "/api/photographs/10/", x);
    mocks::expect_get(&server, "/api/photographs/11/", y);

    photocat(&home, &server)
        .args(["albums", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trips (4 photos)"));

    photocat(&home, &server)
        .args(["albums", "common", "10", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pets"))
        .stdout(predicate::str::contains("Trips").not());
}

#[test]
fn catalog_lists_planned_actions() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_first_page(
        &server,
        "/api/planned-actions/",
        mocks::page(vec![mocks::planned_action(1, 4)], None),
    );

    photocat(&home, &server)
        .args(["catalog", "planned-actions"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""action_type":"DELETE","photograph":4"#));
}

#[test]
fn catalog_dumps_json_lines() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    mocks::expect_first_page(
        &server,
        "/api/dir-kinds/",
        mocks::page(vec![json!({ "id": 1, "name": "raw" })], None),
    );

    photocat(&home, &server)
        .args(["catalog", "dir-kinds"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"id":1,"name":"raw"}"#));
}

#[test]
fn show_config_reads_environment() {
    let home = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("photocat").unwrap();
    cmd.env("HOME", home.path());
    cmd.env("PHOTOCAT_GROUPING", "client");
    cmd.env("PHOTOCAT_API_BASE_URL", "http://catalog.local/api");
    cmd.arg("show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"grouping = "client""#))
        .stdout(predicate::str::contains(r#"api_base_url = "http://catalog.local/api""#));
}

#[test]
fn unknown_grouping_is_rejected() {
    let home = TempDir::new().unwrap();
    let server = catalog_server();
    photocat(&home, &server)
        .args(["--grouping", "both", "show-config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown grouping mode"));
}
