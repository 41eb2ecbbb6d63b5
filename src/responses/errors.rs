use crate::errors::ServerError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};
use tracing::{error, warn};

/// Convert a ServerError into an HTML error page.
pub fn error_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        error!(status, error = %err, "request failed");
    } else {
        warn!(status, error = %err, "request rejected");
    }

    let message = match &err {
        ServerError::NotFound => "Not Found".to_string(),
        ServerError::BadRequest(msg) => msg.clone(),
        ServerError::NoSession => "Your session has expired. Reload the page.".to_string(),
        ServerError::Catalog(_) | ServerError::InternalError => "Internal Server Error".to_string(),
    };

    let mut builder = ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref());
    // htmx reloads the page, which starts a fresh session
    if matches!(err, ServerError::NoSession) {
        builder = builder.header("HX-Refresh", "true");
    }

    builder
        .body(Body::from(error_page(status, &message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
