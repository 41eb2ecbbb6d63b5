// src/tests/router_tests/explorer_tests.rs

use crate::responses::error_response;
use crate::router::handle;
use crate::sessions::SESSION_COOKIE;
use crate::tests::utils::{body_string, error_status, get, post, set_cookie, test_state};
use astra::Body;
use http::Method;
use serde_json::Value;

/// Load the explorer for `query` and hand back the session cookie.
fn open(state: &crate::state::AppState, query: &str) -> String {
    let resp = handle(get(&format!("/?query={query}"), None), state).unwrap();
    assert_eq!(resp.status(), 200);
    set_cookie(&resp, SESSION_COOKIE).expect("new session sets a cookie")
}

fn map_json(state: &crate::state::AppState, cookie: &str) -> Value {
    let resp = handle(get("/explorer/map", Some(cookie)), state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    serde_json::from_str(&body_string(resp)).unwrap()
}

#[test]
fn explorer_page_renders_first_page() {
    let state = test_state(30);
    let resp = handle(get("/", None), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(set_cookie(&resp, SESSION_COOKIE).is_some());

    let body = body_string(resp);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("32 properties"));
    assert!(body.contains("Tower 1"));
    assert!(body.contains("Tower 25"));
    assert!(!body.contains("Tower 26"));
    assert!(body.contains("Not on the map"));
    assert!(body.contains(r#"hx-trigger="revealed""#));
}

#[test]
fn session_cookie_is_reused() {
    let state = test_state(3);
    let cookie = open(&state, "tower");

    let resp = handle(get("/explorer/list", Some(&cookie)), &state).unwrap();
    assert!(set_cookie(&resp, SESSION_COOKIE).is_none());
    assert!(body_string(resp).contains("3 results for"));
}

#[test]
fn near_end_grows_the_list() {
    let state = test_state(30);
    let cookie = open(&state, "");

    let resp = handle(post("/explorer/more", Some(&cookie)), &state).unwrap();
    assert_eq!(resp.headers().get("hx-trigger").unwrap(), "mapped-changed");
    let body = body_string(resp);
    assert!(body.contains("Tower 30"));
    assert!(body.contains("Saadiyat Villa"));
    assert!(!body.contains(r#"hx-trigger="revealed""#));

    let markers = map_json(&state, &cookie)["markers"].as_array().unwrap().len();
    assert_eq!(markers, 15);
}

#[test]
fn growing_the_list_refreshes_the_map_panel() {
    let state = test_state(30);
    let page = handle(get("/?query=", None), &state).unwrap();
    let cookie = set_cookie(&page, SESSION_COOKIE).unwrap();
    let page = body_string(page);
    assert!(page.contains("mapped-changed from:body"));
    assert_eq!(page.matches(r#"class="marker"#).count(), 13);

    let more = handle(post("/explorer/more", Some(&cookie)), &state).unwrap();
    assert_eq!(more.headers().get("hx-trigger").unwrap(), "mapped-changed");

    let panel = body_string(handle(get("/explorer/panel", Some(&cookie)), &state).unwrap());
    assert_eq!(panel.matches(r#"class="marker"#).count(), 15);
}

#[test]
fn more_without_growth_leaves_the_map_alone() {
    let state = test_state(3);
    let cookie = open(&state, "");

    let resp = handle(post("/explorer/more", Some(&cookie)), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("hx-trigger").is_none());
}

#[test]
fn fragments_never_start_sessions() {
    let state = test_state(3);

    for _ in 0..20 {
        assert_eq!(error_status(handle(get("/explorer/list", None), &state)), 400);
    }
    assert_eq!(error_status(handle(post("/explorer/more", None), &state)), 400);
    assert_eq!(error_status(handle(get("/explorer/map", None), &state)), 400);
    assert_eq!(state.sessions.len(), 0);

    let stale = format!("{SESSION_COOKIE}=gone");
    let err = match handle(get("/explorer/panel", Some(&stale)), &state) {
        Ok(resp) => panic!("expected an error, got {}", resp.status()),
        Err(err) => err,
    };
    let resp = error_response(err);
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.headers().get("hx-refresh").unwrap(), "true");
    assert_eq!(state.sessions.len(), 0);

    open(&state, "");
    assert_eq!(state.sessions.len(), 1);
}

#[test]
fn unreadable_form_body_is_rejected() {
    let state = test_state(1);
    let cookie = open(&state, "");
    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/explorer/select")
        .header("Cookie", &cookie)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(vec![0xff, 0xfe, 0xfd]))
        .unwrap();

    assert_eq!(error_status(handle(req, &state)), 400);
}

#[test]
fn map_frame_lists_mapped_records_with_fit() {
    let state = test_state(4);
    let cookie = open(&state, "tower");

    let frame = map_json(&state, &cookie);
    let ids: Vec<u64> = frame["markers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(frame["fit"]["padding"]["top"], 50.0);
    assert!(frame["pan_to"].is_null());
}

#[test]
fn selection_reaches_list_map_and_panel() {
    let state = test_state(4);
    let cookie = open(&state, "tower");

    let resp = handle(post("/explorer/select?id=3", Some(&cookie)), &state).unwrap();
    assert_eq!(resp.status(), 204);
    assert_eq!(resp.headers().get("hx-trigger").unwrap(), "selection-changed");

    let frame = map_json(&state, &cookie);
    let selected: Vec<_> = frame["markers"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|m| m["selected"] == true)
        .map(|m| m["id"].as_u64().unwrap())
        .collect();
    assert_eq!(selected, vec![3]);
    assert_eq!(frame["markers"][1]["style"]["scale"], 1.0);
    assert!(!frame["pan_to"].is_null());

    let list = body_string(handle(get("/explorer/list", Some(&cookie)), &state).unwrap());
    assert!(list.contains(r#"data-scroll-into-view="property-3""#));
    assert!(list.contains(r#"id="property-3" class="row selected""#));

    let panel = body_string(handle(get("/explorer/panel", Some(&cookie)), &state).unwrap());
    assert!(panel.contains("detail-panel"));
    assert!(panel.contains("Tower 3"));
}

#[test]
fn selecting_a_hidden_record_changes_nothing() {
    let state = test_state(30);
    let cookie = open(&state, "");

    let resp = handle(post("/explorer/select?id=29", Some(&cookie)), &state).unwrap();
    assert_eq!(resp.status(), 204);
    assert!(resp.headers().get("hx-trigger").is_none());
}

#[test]
fn select_needs_a_numeric_id() {
    let state = test_state(2);
    let cookie = open(&state, "");

    assert_eq!(error_status(handle(post("/explorer/select?id=abc", Some(&cookie)), &state)), 400);
    assert_eq!(error_status(handle(post("/explorer/select", Some(&cookie)), &state)), 400);
}

#[test]
fn click_outside_panel_clears_selection() {
    let state = test_state(4);
    let cookie = open(&state, "tower");
    handle(post("/explorer/select?id=1", Some(&cookie)), &state).unwrap();

    let panel = "left=100&top=100&width=288&height=320";

    let inside = handle(
        post(&format!("/explorer/click?x=150&y=200&{panel}"), Some(&cookie)),
        &state,
    )
    .unwrap();
    assert!(inside.headers().get("hx-trigger").is_none());

    let no_panel = handle(post("/explorer/click?x=5&y=5", Some(&cookie)), &state).unwrap();
    assert!(no_panel.headers().get("hx-trigger").is_none());

    let outside = handle(
        post(&format!("/explorer/click?x=5&y=5&{panel}"), Some(&cookie)),
        &state,
    )
    .unwrap();
    assert_eq!(outside.headers().get("hx-trigger").unwrap(), "selection-changed");

    let panel_html = body_string(handle(get("/explorer/panel", Some(&cookie)), &state).unwrap());
    assert!(!panel_html.contains("detail-panel"));
}

#[test]
fn partial_panel_rect_is_rejected() {
    let state = test_state(2);
    let cookie = open(&state, "");
    assert_eq!(error_status(handle(post("/explorer/click?x=1&y=1&left=3", Some(&cookie)), &state)), 400);
}

#[test]
fn deselect_closes_panel() {
    let state = test_state(4);
    let cookie = open(&state, "tower");
    handle(post("/explorer/select?id=2", Some(&cookie)), &state).unwrap();

    let resp = handle(post("/explorer/deselect", Some(&cookie)), &state).unwrap();
    assert_eq!(resp.status(), 204);

    let frame = map_json(&state, &cookie);
    assert!(frame["markers"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["selected"] == false));
}

#[test]
fn new_query_replaces_results() {
    let state = test_state(4);
    let cookie = open(&state, "tower");

    let resp = handle(get("/?query=abu%20dhabi%2C%20UAE", Some(&cookie)), &state).unwrap();
    let body = body_string(resp);
    assert!(body.contains("2 results for"));
    assert!(body.contains("Saadiyat Villa"));
    assert!(!body.contains("Tower 1"));

    let frame = map_json(&state, &cookie);
    assert!(frame["markers"].as_array().unwrap().is_empty());
    assert!(frame["fit"].is_null());
}

#[test]
fn no_matches_shows_empty_state() {
    let state = test_state(4);
    let resp = handle(get("/?query=atlantis", None), &state).unwrap();
    assert!(body_string(resp).contains("No properties found"));
}

#[test]
fn unknown_route_is_not_found() {
    let state = test_state(1);
    assert_eq!(error_status(handle(get("/nope", None), &state)), 404);
}

#[test]
fn serves_static_assets() {
    let state = test_state(1);
    let resp = handle(get("/static/explorer.js", None), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("/explorer/click"));
}
