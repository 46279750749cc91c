//! Minimal HTTP/1.x request model.
//!
//! Just enough parsing to route the two bound paths and to describe an
//! unmatched request on the diagnostic page: the request line, the path
//! and the query arguments. Headers and bodies are ignored; every
//! response is built from a status line, a content type and a
//! `Content-Length` and closes the connection.

use core::fmt::Write as _;

use heapless::String;

/// Capacity of the 404 diagnostic body.
pub const NOT_FOUND_CAPACITY: usize = 512;

/// Capacity of a response head.
pub const HEAD_CAPACITY: usize = 128;

pub const CONTENT_TYPE_PLAIN: &str = "text/plain";
pub const CONTENT_TYPE_HTML: &str = "text/html";

/// Request method as the diagnostic page reports it.
///
/// GET parses as GET; every other token is reported as POST. That
/// collapses all non-GET methods into one bucket and is kept for
/// compatibility with the diagnostic page's historical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn from_token(token: &str) -> Self {
        if token == "GET" { Method::Get } else { Method::Post }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Parsed request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    /// Path component of the request target, query string excluded.
    pub path: &'a str,
    /// Raw query string after `?`, empty when absent.
    pub query: &'a str,
}

impl<'a> Request<'a> {
    /// Parses the request line out of a raw request head.
    pub fn parse(head: &'a str) -> Option<Self> {
        let request_line = head.lines().next()?;
        let mut parts = request_line.split_whitespace();
        let method = Method::from_token(parts.next()?);
        let target = parts.next()?;
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        Some(Self {
            method,
            path,
            query,
        })
    }

    /// Iterator over the `name=value` pairs of the query string. A pair
    /// without `=` yields an empty value.
    pub fn args(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name, value),
                None => (pair, ""),
            })
    }

    pub fn arg_count(&self) -> usize {
        self.args().count()
    }
}

/// Where a request path routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The metrics document, bound to `/` and `/metrics` (same handler).
    Metrics,
    /// Everything else: the 404 diagnostic page.
    NotFound,
}

pub fn route(path: &str) -> Route {
    match path {
        "/" | "/metrics" => Route::Metrics,
        _ => Route::NotFound,
    }
}

/// Builds the 404 diagnostic body: the unmatched URI, the method, the
/// argument count and one indented line per query argument.
pub fn render_not_found(request: &Request) -> String<NOT_FOUND_CAPACITY> {
    let mut body = String::new();
    let _ = write!(
        body,
        "File Not Found\n\nURI: {}\nMethod: {}\nArguments: {}\n",
        request.path,
        request.method.as_str(),
        request.arg_count()
    );
    for (name, value) in request.args() {
        let _ = writeln!(body, " {}: {}", name, value);
    }
    body
}

/// Builds a response head with the given status, content type and body
/// length. The connection is closed after every response.
pub fn response_head(
    status: u16,
    reason: &str,
    content_type: &str,
    content_length: usize,
) -> String<HEAD_CAPACITY> {
    let mut head = String::new();
    let _ = write!(
        head,
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nConnection: close\r\nContent-Length: {}\r\n\r\n",
        status, reason, content_type, content_length
    );
    head
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_a_plain_get() {
        let request = Request::parse("GET /metrics HTTP/1.1\r\nHost: node\r\n\r\n").unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/metrics");
        assert_eq!(request.query, "");
        assert_eq!(request.arg_count(), 0);
        assert_eq!(route(request.path), Route::Metrics);
    }

    #[test]
    fn both_data_paths_share_the_handler() {
        assert_eq!(route("/"), Route::Metrics);
        assert_eq!(route("/metrics"), Route::Metrics);
        assert_eq!(route("/foo"), Route::NotFound);
        assert_eq!(route("/metrics/"), Route::NotFound);
    }

    #[test]
    fn query_string_splits_off_the_path() {
        let request = Request::parse("GET /foo?x=1 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path, "/foo");
        assert_eq!(request.query, "x=1");
        assert_eq!(request.arg_count(), 1);
        assert_eq!(request.args().next(), Some(("x", "1")));
    }

    #[test]
    fn non_get_methods_report_as_post() {
        for token in ["POST", "PUT", "DELETE", "HEAD", "OPTIONS"] {
            assert_eq!(Method::from_token(token), Method::Post);
        }
        assert_eq!(Method::from_token("GET"), Method::Get);
    }

    #[test]
    fn not_found_body_describes_the_request() {
        let request = Request::parse("GET /foo?x=1 HTTP/1.1\r\n\r\n").unwrap();
        let body = render_not_found(&request);
        assert_eq!(
            body.as_str(),
            "File Not Found\n\nURI: /foo\nMethod: GET\nArguments: 1\n x: 1\n"
        );
    }

    #[test]
    fn not_found_body_lists_every_argument() {
        let request = Request::parse("POST /api?a=1&b=two&flag HTTP/1.1\r\n\r\n").unwrap();
        let body = render_not_found(&request);
        assert!(body.contains("URI: /api\n"));
        assert!(body.contains("Method: POST\n"));
        assert!(body.contains("Arguments: 3\n"));
        assert!(body.contains(" a: 1\n"));
        assert!(body.contains(" b: two\n"));
        assert!(body.contains(" flag: \n"));
    }

    #[test]
    fn not_found_body_without_arguments() {
        let request = Request::parse("DELETE /nope HTTP/1.1\r\n\r\n").unwrap();
        let body = render_not_found(&request);
        assert_eq!(
            body.as_str(),
            "File Not Found\n\nURI: /nope\nMethod: POST\nArguments: 0\n"
        );
    }

    #[test]
    fn unparsable_request_line_is_rejected_not_panicked() {
        assert_eq!(Request::parse(""), None);
        assert_eq!(Request::parse("\r\n"), None);
        assert_eq!(Request::parse("GET"), None);
    }

    #[test]
    fn response_head_shape() {
        let head = response_head(200, "OK", CONTENT_TYPE_PLAIN, 123);
        assert_eq!(
            head.as_str(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\nContent-Length: 123\r\n\r\n"
        );
    }
}
