use std::collections::HashMap;

use chrono::Utc;
use reqwest::Url;

use crate::{Error, Res};

pub const SUCCESS_BODY: &str = "Success! (You can close this now)";

/// Followed by the token endpoint's error body, verbatim.
pub const FAILURE_PREFIX: &str = "Spotify didn't like that\n";

/// Followed by the `error` parameter Spotify sent instead of a code.
pub const DENIED_PREFIX: &str = "Authorization was not granted: ";

pub const MISSING_CODE_BODY: &str = "The callback did not contain an authorization code.";
pub const STATE_MISMATCH_BODY: &str =
    "The callback state did not match this authorization request. Run `shellify authenticate` again.";
pub const MALFORMED_BODY: &str = "Malformed callback request.";

/// The request line of the OAuth redirect, e.g.
/// `GET /callback?code=ABC123&state=xyz HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub path: String,
    pub params: HashMap<String, String>,
}

impl CallbackRequest {
    pub fn parse(request_line: &str) -> Res<Self> {
        let mut parts = request_line.split_whitespace();
        let (Some(_method), Some(target)) = (parts.next(), parts.next()) else {
            return Err(Error::InvalidResponse(format!(
                "malformed request line: {:?}",
                request_line.trim_end()
            )));
        };

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        Ok(Self {
            path: path.to_string(),
            params: parse_query(query),
        })
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn code(&self) -> Option<&str> {
        self.param("code").filter(|c| !c.is_empty())
    }
}

/// Decodes a query string. When a key repeats, the first value wins.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return params;
    };
    url.set_query(Some(query));

    for (key, value) in url.query_pairs() {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Frames `body` as a complete `200 OK` response.
pub fn render_response(body: &str) -> String {
    let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT");
    [
        "HTTP/1.1 200 OK".to_string(),
        format!("date: {date}"),
        format!("server: {}", env!("CARGO_PKG_NAME")),
        format!("Content-Length: {}", body.len()),
        String::new(),
        body.to_string(),
    ]
    .join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_from_request_line() {
        let request = CallbackRequest::parse("GET /callback?code=ABC123 HTTP/1.1\r\n").unwrap();
        assert_eq!(request.path, "/callback");
        assert_eq!(request.code(), Some("ABC123"));
    }

    #[test]
    fn first_value_wins() {
        let params = parse_query("code=first&code=second&state=s");
        assert_eq!(params.get("code").map(String::as_str), Some("first"));
        assert_eq!(params.get("state").map(String::as_str), Some("s"));
    }

    #[test]
    fn query_values_are_decoded() {
        let params = parse_query("error=access%20denied&x=a+b");
        assert_eq!(params["error"], "access denied");
        assert_eq!(params["x"], "a b");
    }

    #[test]
    fn empty_code_counts_as_missing() {
        let request = CallbackRequest::parse("GET /callback?code= HTTP/1.1").unwrap();
        assert_eq!(request.code(), None);
    }

    #[test]
    fn request_without_target_is_rejected() {
        assert!(CallbackRequest::parse("").is_err());
        assert!(CallbackRequest::parse("GET").is_err());
    }

    #[test]
    fn content_length_counts_bytes() {
        let body = "caf\u{e9}";
        let response = render_response(body);
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Length: 5\r\n"));
        assert!(response.ends_with("\r\n\r\ncaf\u{e9}"));
    }
}
