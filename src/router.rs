use crate::cookies::cookie;
use crate::domain::{PropertyId, Rect, ScreenPoint};
use crate::errors::{ResultResp, ServerError};
use crate::responses::{html_response, json_response, no_content, with_header};
use crate::search::suggestions::PROPERTY_SUGGESTION_LIMIT;
use crate::search::{suggest, RecentSearches, SearchKind};
use crate::search::saved::SAVED_SEARCHES_COOKIE;
use crate::sessions::{SessionHandle, SESSION_COOKIE};
use crate::state::AppState;
use crate::templates::components::{
    map_panel, property_list, recent_searches_dropdown, suggestions_dropdown,
};
use crate::templates::{pages, query_href};
use astra::{Body, Request, Response, ResponseBuilder};
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;
use url::form_urlencoded;

const SELECTION_CHANGED: &str = "selection-changed";
/// New rows joined the visible page; the map panel refetches.
const MAPPED_CHANGED: &str = "mapped-changed";
const EXPLORER_CSS: &str = include_str!("../static/explorer.css");
const EXPLORER_JS: &str = include_str!("../static/explorer.js");

type Params = HashMap<String, String>;

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let params = parse_params(&mut req)?;

    debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => explorer_page(&req, state, &params),
        ("GET", "/explorer/list") => list_fragment(&req, state),
        ("GET", "/explorer/map") => map_json(&req, state),
        ("GET", "/explorer/panel") => map_fragment(&req, state),
        ("POST", "/explorer/more") => load_more(&req, state),
        ("POST", "/explorer/select") => select(&req, state, &params),
        ("POST", "/explorer/deselect") => deselect(&req, state),
        ("POST", "/explorer/click") => click(&req, state, &params),
        ("GET", "/search/suggest") => suggestions(&req, state, &params),
        ("POST", "/searches/save") => save_search(&req, &params),
        ("POST", "/searches/remove") => remove_search(&req, &params),
        ("GET", "/static/explorer.css") => static_asset(EXPLORER_CSS, mime::TEXT_CSS_UTF_8),
        ("GET", "/static/explorer.js") => {
            static_asset(EXPLORER_JS, mime::APPLICATION_JAVASCRIPT_UTF_8)
        }
        _ => Err(ServerError::NotFound),
    }
}

fn explorer_page(req: &Request, state: &AppState, params: &Params) -> ResultResp {
    let session = session(req, state);
    let query = params.get("query").map(String::as_str).unwrap_or_default();

    let batch = session.explorer.lock().navigate(query);
    state.dispatch(&session.explorer, batch);

    let markup = {
        let mut explorer = session.explorer.lock();
        let snapshot = explorer.snapshot();
        let markup = pages::explorer_page(&snapshot, explorer.selected());
        markup
    };

    with_session_cookie(html_response(markup)?, &session)
}

fn list_fragment(req: &Request, state: &AppState) -> ResultResp {
    let session = existing_session(req, state)?;
    let view = session.explorer.lock().list_view();
    html_response(property_list(&view))
}

fn map_json(req: &Request, state: &AppState) -> ResultResp {
    let session = existing_session(req, state)?;
    let frame = session.explorer.lock().map_frame();
    json_response(&frame)
}

fn map_fragment(req: &Request, state: &AppState) -> ResultResp {
    let session = existing_session(req, state)?;
    let markup = {
        let explorer = session.explorer.lock();
        let frame = explorer.map_frame();
        let markup = map_panel(&frame, explorer.selected(), explorer.is_loading());
        markup
    };
    html_response(markup)
}

/// Grow the list by a page. When it grew, the map panel is told to refetch;
/// it keeps polling on its own while the new rows geocode.
fn load_more(req: &Request, state: &AppState) -> ResultResp {
    let session = existing_session(req, state)?;

    let batch = session.explorer.lock().near_end();
    let grew = batch.is_some();
    state.dispatch(&session.explorer, batch);

    let view = session.explorer.lock().list_view();
    let resp = html_response(property_list(&view))?;
    if grew {
        with_header(resp, "HX-Trigger", MAPPED_CHANGED)
    } else {
        Ok(resp)
    }
}

fn select(req: &Request, state: &AppState, params: &Params) -> ResultResp {
    let id: PropertyId = required(params, "id")?;
    let session = existing_session(req, state)?;
    let effects = session.explorer.lock().select(Some(id));
    selection_response(effects.is_some())
}

fn deselect(req: &Request, state: &AppState) -> ResultResp {
    let session = existing_session(req, state)?;
    session.explorer.lock().deselect();
    selection_response(true)
}

fn click(req: &Request, state: &AppState, params: &Params) -> ResultResp {
    let at = ScreenPoint {
        x: required(params, "x")?,
        y: required(params, "y")?,
    };
    let panel = panel_rect(params)?;

    let session = existing_session(req, state)?;
    let effects = session.explorer.lock().click(at, panel);
    selection_response(effects.is_some())
}

fn suggestions(req: &Request, state: &AppState, params: &Params) -> ResultResp {
    let query = params.get("query").map(|q| q.trim()).unwrap_or_default();

    if query.is_empty() {
        return html_response(recent_searches_dropdown(&recent_searches(req)));
    }

    let suggestions = suggest(
        state.catalog.records(),
        query,
        state.city_dedup,
        PROPERTY_SUGGESTION_LIMIT,
    );
    html_response(suggestions_dropdown(&suggestions))
}

/// Remember the query, then send the browser to the explorer for it.
fn save_search(req: &Request, params: &Params) -> ResultResp {
    let query = params.get("query").map(|q| q.trim()).unwrap_or_default();
    let mut recent = recent_searches(req);
    let now_ms = chrono::Utc::now().timestamp_millis();
    recent.save(query, SearchKind::for_query(query), now_ms);

    let resp = ResponseBuilder::new()
        .status(303)
        .header("Location", query_href("/", query))
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)?;
    with_header(resp, "Set-Cookie", &recent.set_cookie_header())
}

fn remove_search(req: &Request, params: &Params) -> ResultResp {
    let query = params.get("query").map(|q| q.trim()).unwrap_or_default();
    let mut recent = recent_searches(req);
    recent.remove(query);

    let resp = html_response(recent_searches_dropdown(&recent))?;
    with_header(resp, "Set-Cookie", &recent.set_cookie_header())
}

fn static_asset(content: &'static str, content_type: mime::Mime) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type.as_ref())
        .header("Cache-Control", "public, max-age=3600")
        .body(Body::from(content))
        .map_err(|_| ServerError::InternalError)
}

fn session(req: &Request, state: &AppState) -> SessionHandle {
    let token = cookie(req, SESSION_COOKIE);
    state.session(token.as_deref())
}

fn existing_session(req: &Request, state: &AppState) -> Result<SessionHandle, ServerError> {
    let token = cookie(req, SESSION_COOKIE);
    state.existing_session(token.as_deref())
}

fn with_session_cookie(resp: Response, session: &SessionHandle) -> ResultResp {
    match session.set_cookie_header() {
        Some(header) => with_header(resp, "Set-Cookie", &header),
        None => Ok(resp),
    }
}

/// 204; tells htmx to refresh both views when the selection moved.
fn selection_response(changed: bool) -> ResultResp {
    let resp = no_content()?;
    if changed {
        with_header(resp, "HX-Trigger", SELECTION_CHANGED)
    } else {
        Ok(resp)
    }
}

fn recent_searches(req: &Request) -> RecentSearches {
    cookie(req, SAVED_SEARCHES_COOKIE)
        .map(|value| RecentSearches::from_cookie_value(&value))
        .unwrap_or_default()
}

/// The panel rectangle is optional, but all four sides come together.
fn panel_rect(params: &Params) -> Result<Option<Rect>, ServerError> {
    let keys = ["left", "top", "width", "height"];
    if keys.iter().all(|k| !params.contains_key(*k)) {
        return Ok(None);
    }

    Ok(Some(Rect {
        left: required(params, "left")?,
        top: required(params, "top")?,
        width: required(params, "width")?,
        height: required(params, "height")?,
    }))
}

fn required<T: std::str::FromStr>(params: &Params, key: &str) -> Result<T, ServerError> {
    let raw = params
        .get(key)
        .ok_or_else(|| ServerError::BadRequest(format!("missing '{key}'")))?;
    raw.trim()
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid '{key}': {raw}")))
}

/// Query string pairs, plus the body of url-encoded form posts. Body values
/// win over the query string.
fn parse_params(req: &mut Request) -> Result<Params, ServerError> {
    let mut params: Params = req
        .uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let is_form = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(mime::APPLICATION_WWW_FORM_URLENCODED.as_ref()));

    if is_form {
        let mut body = String::new();
        req.body_mut()
            .reader()
            .read_to_string(&mut body)
            .map_err(|e| {
                debug!(error = %e, "unreadable form body");
                ServerError::BadRequest("unreadable form body".into())
            })?;
        params.extend(form_urlencoded::parse(body.as_bytes()).into_owned());
    }

    Ok(params)
}
