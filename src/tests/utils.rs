use crate::catalog::Catalog;
use crate::domain::{GeoPoint, PropertyRecord};
use crate::errors::ResultResp;
use crate::geocode::FixtureGeocoder;
use crate::state::{AppState, Dispatch};
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use std::sync::Arc;

/// `n` towers in Dubai plus two Abu Dhabi villas. Odd towers geocode, even
/// towers and the villas do not.
pub fn test_catalog(n: u64) -> Vec<PropertyRecord> {
    let mut records: Vec<_> = (1..=n)
        .map(|i| {
            PropertyRecord::new(i, "Dubai")
                .with_name(format!("Tower {i}"))
                .with_community("Dubai Marina")
                .with_price(1_000_000.0 + i as f64)
        })
        .collect();
    records.push(PropertyRecord::new(n + 1, "Abu Dhabi").with_name("Saadiyat Villa"));
    records.push(PropertyRecord::new(n + 2, "abu dhabi").with_community("Yas Island"));
    records
}

pub fn test_geocoder(records: &[PropertyRecord]) -> FixtureGeocoder {
    FixtureGeocoder::new(
        records
            .iter()
            .filter(|r| r.city == "Dubai" && r.id.0 % 2 == 1)
            .map(|r| {
                let offset = r.id.0 as f64 / 1000.0;
                (r.geocode_address(), GeoPoint::new(25.07 + offset, 55.13 + offset))
            })
            .collect::<Vec<_>>(),
    )
}

/// App state over [`test_catalog`] that geocodes on the request thread, so a
/// response already reflects every lookup it started.
pub fn test_state(n: u64) -> AppState {
    crate::logging::test();
    let records = test_catalog(n);
    let geocoder = test_geocoder(&records);
    let catalog = Catalog::from_records(records).expect("test catalog is valid");
    AppState::new(Arc::new(catalog), Arc::new(geocoder)).with_dispatch(Dispatch::Inline)
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request {
    request(Method::GET, uri, cookie)
}

pub fn post(uri: &str, cookie: Option<&str>) -> Request {
    request(Method::POST, uri, cookie)
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut body)
        .expect("readable body");
    body
}

/// `name=value` of the first `Set-Cookie` for `name`, ready to send back.
pub fn set_cookie(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

pub fn error_status(result: ResultResp) -> u16 {
    match result {
        Ok(resp) => panic!("expected an error, got {}", resp.status()),
        Err(err) => err.status(),
    }
}
