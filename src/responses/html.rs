use crate::errors::{ResultResp, ServerError};
use astra::{Body, Response, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

/// Empty 204, used for state changes the page picks up through htmx events.
pub fn no_content() -> ResultResp {
    ResponseBuilder::new()
        .status(204)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

/// Append a header to an already built response.
pub fn with_header(mut resp: Response, name: &'static str, value: &str) -> ResultResp {
    resp.headers_mut()
        .append(name, value.parse().map_err(|_| ServerError::InternalError)?);
    Ok(resp)
}
