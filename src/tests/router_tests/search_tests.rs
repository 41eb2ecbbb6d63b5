// src/tests/router_tests/search_tests.rs

use crate::router::handle;
use crate::search::saved::SAVED_SEARCHES_COOKIE;
use crate::search::{CityDedup, RecentSearches, SearchKind};
use crate::tests::utils::{body_string, get, post, set_cookie, test_state};
use astra::Body;
use http::Method;

fn saved_cookie(entries: &[(&str, SearchKind)]) -> String {
    let mut recent = RecentSearches::default();
    for (i, (query, kind)) in entries.iter().rev().enumerate() {
        recent.save(query, *kind, i as i64);
    }
    format!("{SAVED_SEARCHES_COOKIE}={}", recent.to_cookie_value())
}

fn decode(cookie: &str) -> RecentSearches {
    let value = cookie
        .strip_prefix(&format!("{SAVED_SEARCHES_COOKIE}="))
        .unwrap();
    RecentSearches::from_cookie_value(value)
}

#[test]
fn suggests_locations_and_properties() {
    let state = test_state(3);
    let body = body_string(handle(get("/search/suggest?query=abu", None), &state).unwrap());

    assert!(body.contains("Locations"));
    assert_eq!(body.matches(">Abu Dhabi<").count(), 1);
    assert!(!body.contains(">abu dhabi<"));
    assert!(body.contains("Saadiyat Villa"));
    assert!(body.contains("Unnamed Property"));
}

#[test]
fn case_sensitive_dedup_keeps_both_spellings() {
    let state = test_state(3).with_city_dedup(CityDedup::CaseSensitive);
    let body = body_string(handle(get("/search/suggest?query=abu", None), &state).unwrap());

    assert!(body.contains(">Abu Dhabi<"));
    assert!(body.contains(">abu dhabi<"));
}

#[test]
fn unmatched_query_says_no_results() {
    let state = test_state(3);
    let body = body_string(handle(get("/search/suggest?query=zzz", None), &state).unwrap());
    assert!(body.contains("No results found"));
}

#[test]
fn empty_query_lists_recent_searches() {
    let state = test_state(1);
    let cookie = saved_cookie(&[
        ("Dubai, UAE", SearchKind::Location),
        ("Marina Gate", SearchKind::Property),
    ]);

    let body = body_string(handle(get("/search/suggest?query=", Some(&cookie)), &state).unwrap());
    assert!(body.contains("Recent searches"));
    let dubai = body.find("Dubai, UAE").unwrap();
    let marina = body.find("Marina Gate").unwrap();
    assert!(dubai < marina);
}

#[test]
fn empty_query_without_history_is_blank() {
    let state = test_state(1);
    let body = body_string(handle(get("/search/suggest", None), &state).unwrap());
    assert!(body.is_empty());
}

#[test]
fn malformed_saved_cookie_is_ignored() {
    let state = test_state(1);
    let cookie = format!("{SAVED_SEARCHES_COOKIE}=%%%not-base64");
    let body = body_string(handle(get("/search/suggest", Some(&cookie)), &state).unwrap());
    assert!(body.is_empty());
}

#[test]
fn plain_search_does_not_save() {
    let state = test_state(1);
    let resp = handle(get("/?query=Dubai%2C%20UAE", None), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(set_cookie(&resp, SAVED_SEARCHES_COOKIE).is_none());
    assert!(body_string(resp).contains(r#"formaction="/searches/save""#));
}

#[test]
fn saving_redirects_and_sets_cookie() {
    let state = test_state(1);
    let resp = handle(post("/searches/save?query=Dubai%2C%20UAE", None), &state).unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("location").unwrap(), "/?query=Dubai%2C+UAE");

    let cookie = set_cookie(&resp, SAVED_SEARCHES_COOKIE).unwrap();
    let recent = decode(&cookie);
    assert_eq!(recent.entries().len(), 1);
    assert_eq!(recent.entries()[0].query, "Dubai, UAE");
    assert_eq!(recent.entries()[0].kind, SearchKind::Location);
}

#[test]
fn saving_from_a_form_post() {
    let state = test_state(1);
    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/searches/save")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from("query=Marina+Gate"))
        .unwrap();

    let resp = handle(req, &state).unwrap();
    assert_eq!(resp.status(), 303);
    let recent = decode(&set_cookie(&resp, SAVED_SEARCHES_COOKIE).unwrap());
    assert_eq!(recent.entries()[0].query, "Marina Gate");
    assert_eq!(recent.entries()[0].kind, SearchKind::Property);
}

#[test]
fn saved_searches_dedup_and_cap() {
    let state = test_state(1);
    let mut cookie = saved_cookie(&[]);

    for query in ["a1", "b2", "c3", "d4", "e5", "f6", "F6"] {
        let resp = handle(
            post(&format!("/searches/save?query={query}"), Some(&cookie)),
            &state,
        )
        .unwrap();
        cookie = set_cookie(&resp, SAVED_SEARCHES_COOKIE).unwrap();
    }

    let queries: Vec<_> = decode(&cookie)
        .entries()
        .iter()
        .map(|s| s.query.clone())
        .collect();
    assert_eq!(queries, vec!["f6", "e5", "d4", "c3", "b2"]);
}

#[test]
fn removing_returns_updated_dropdown() {
    let state = test_state(1);
    let cookie = saved_cookie(&[
        ("Dubai, UAE", SearchKind::Location),
        ("Marina Gate", SearchKind::Property),
    ]);

    let resp = handle(post("/searches/remove?query=dubai,%20uae", Some(&cookie)), &state).unwrap();
    let updated = set_cookie(&resp, SAVED_SEARCHES_COOKIE).unwrap();
    let body = body_string(resp);

    assert!(!body.contains("Dubai, UAE"));
    assert!(body.contains("Marina Gate"));
    assert_eq!(decode(&updated).entries().len(), 1);
}
