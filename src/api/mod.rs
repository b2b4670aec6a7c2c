//! # API Module
//!
//! The HTTP surface shellify exposes to the browser: the single OAuth
//! callback request. There is no HTTP framework; the listener in
//! [`crate::server`] reads one request line and answers with one fixed,
//! minimal response.
//!
//! - [`CallbackRequest`] - the parsed request line and its query parameters
//! - [`render_response`] - `HTTP/1.1 200 OK` framing with a `Content-Length`
//!   that matches the body's byte length

mod callback;

pub use callback::{
    CallbackRequest, DENIED_PREFIX, FAILURE_PREFIX, MALFORMED_BODY, MISSING_CODE_BODY,
    STATE_MISMATCH_BODY, SUCCESS_BODY, parse_query, render_response,
};
