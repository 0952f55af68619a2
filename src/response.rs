//! HTTP/1.1 response representation and serialisation.

use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, StatusCode};

#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode) -> Response {
        Response {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Insert a header built from a string value, dropping it silently if
    /// the value is not a legal header value (only reachable with
    /// client-supplied text such as a request URI echoed into `Location`).
    pub fn insert_header(&mut self, name: http::header::HeaderName, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
    }

    /// Set the body and a matching `Content-Length` header.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
        self.headers.insert(
            http::header::CONTENT_LENGTH,
            HeaderValue::from(self.body.len()),
        );
    }

    /// Serialise status line, headers, blank line and body.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(256 + self.body.len());
        let reason = self.status.canonical_reason().unwrap_or("");
        out.put_slice(format!("HTTP/1.1 {} {}\r\n", self.status.as_u16(), reason).as_bytes());
        for (name, value) in &self.headers {
            out.put_slice(name.as_str().as_bytes());
            out.put_slice(b": ");
            out.put_slice(value.as_bytes());
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"\r\n");
        out.put_slice(&self.body);
        out.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_and_terminator() {
        let resp = Response::new(StatusCode::NOT_FOUND);
        let bytes = resp.to_bytes();
        assert!(bytes.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
        assert!(bytes.ends_with(b"\r\n\r\n"));
    }

    #[test]
    fn multi_status_reason_phrase() {
        let resp = Response::new(StatusCode::MULTI_STATUS);
        assert!(resp.to_bytes().starts_with(b"HTTP/1.1 207 Multi-Status\r\n"));
    }

    #[test]
    fn body_and_content_length_agree() {
        let mut resp = Response::new(StatusCode::OK);
        resp.set_body("hello");
        assert_eq!(resp.headers.get("content-length").unwrap(), "5");
        let bytes = resp.to_bytes();
        assert!(bytes.ends_with(b"\r\nhello"));
    }

    #[test]
    fn headers_serialised_as_name_colon_value() {
        let mut resp = Response::new(StatusCode::OK);
        resp.headers.insert("dav", "1, 2".parse().unwrap());
        let text = String::from_utf8(resp.to_bytes().to_vec()).unwrap();
        assert!(text.contains("dav: 1, 2\r\n"));
    }
}
