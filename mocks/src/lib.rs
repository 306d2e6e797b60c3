use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::{json, Value};

pub use httptest;

/// Prefix every catalog route is mounted under.
pub const API_PREFIX: &str = "/api";

/// Create an empty mock server for the catalog API.
pub fn catalog_server() -> Server {
    Server::run()
}

/// Base URL to hand to `ApiClient::new` for the given server.
pub fn api_base(server: &Server) -> String {
    server.url_str(API_PREFIX)
}

/// Absolute `next` cursor for page `page` of `path`.
pub fn next_url(server: &Server, path: &str, page: &str) -> String {
    server.url_str(&format!("{}?page={}", path, page))
}

pub fn page(results: Vec<Value>, next: Option<String>) -> Value {
    json!({
        "count": results.len(),
        "next": next,
        "previous": null,
        "results": results,
    })
}

pub fn photograph(id: u64, time: Option<&str>) -> Value {
    json!({
        "id": id,
        "hash": format!("{:032x}", id),
        "time": time,
        "model": "X100V",
        "error": false,
        "paths": [],
        "albums": [],
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

pub fn photo_path(id: u64, path: &str) -> Value {
    json!({
        "id": id,
        "path": path,
        "device": "nas",
        "photograph": id,
        "siblings": [],
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

pub fn album(id: u64, name: &str, photos_count: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "photos_count": photos_count,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

pub fn planned_action(id: u64, photograph: u64) -> Value {
    json!({
        "id": id,
        "action_type": "DELETE",
        "photograph": photograph,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

/// Expect GETs of `path` without a `page` parameter, answered with `body`.
pub fn expect_first_page(server: &Server, path: &'static str, body: Value) {
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", path),
            request::query(url_decoded(not(contains(key("page"))))),
        ])
        .times(1..)
        .respond_with(json_encoded(body)),
    );
}

/// Expect GETs of `path?page=<page>`, answered with `body`.
pub fn expect_numbered_page(
    server: &Server,
    path: &'static str,
    page: &'static str,
    body: Value,
) {
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", path),
            request::query(url_decoded(contains(("page", page)))),
        ])
        .times(1..)
        .respond_with(json_encoded(body)),
    );
}

/// Expect any GET of `path`, whatever the query, answered with `body`.
pub fn expect_get(server: &Server, path: &'static str, body: Value) {
    server.expect(
        Expectation::matching(request::method_path("GET", path))
            .times(1..)
            .respond_with(json_encoded(body)),
    );
}

/// Expect POSTs to `path`, whatever the body, answered with `body`.
pub fn expect_post(server: &Server, path: &'static str, body: Value) {
    server.expect(
        Expectation::matching(request::method_path("POST", path))
            .times(1..)
            .respond_with(json_encoded(body)),
    );
}

/// Expect any request of `method` on `path`, answered with a bare status code.
pub fn expect_status(server: &Server, method: &'static str, path: &'static str, status: u16) {
    server.expect(
        Expectation::matching(request::method_path(method, path))
            .times(1..)
            .respond_with(status_code(status)),
    );
}
