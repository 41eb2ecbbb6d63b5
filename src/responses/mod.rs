pub mod errors;
pub mod html;
pub mod json;

pub use errors::error_response;
pub use html::{html_response, no_content, with_header};
pub use json::json_response;
