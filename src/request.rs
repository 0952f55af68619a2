//! HTTP/1.1 request framing.
//!
//! The connection worker feeds an accumulating byte buffer into
//! [`Request::parse`] until it stops returning [`ParseError::Incomplete`].
//! The header section ends at the first `\r\n\r\n`; a `Content-Length`
//! header then delimits the body.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};

/// WebDAV request methods. Anything unrecognised parses to `Unknown` and is
/// answered with 501 by the dispatcher rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DavMethod {
    Options,
    Get,
    Head,
    Put,
    Delete,
    PropFind,
    PropPatch,
    MkCol,
    Copy,
    Move,
    Lock,
    Unlock,
    Unknown,
}

impl DavMethod {
    pub fn from_token(token: &str) -> DavMethod {
        match token {
            "OPTIONS" => DavMethod::Options,
            "GET" => DavMethod::Get,
            "HEAD" => DavMethod::Head,
            "PUT" => DavMethod::Put,
            "DELETE" => DavMethod::Delete,
            "PROPFIND" => DavMethod::PropFind,
            "PROPPATCH" => DavMethod::PropPatch,
            "MKCOL" => DavMethod::MkCol,
            "COPY" => DavMethod::Copy,
            "MOVE" => DavMethod::Move,
            "LOCK" => DavMethod::Lock,
            "UNLOCK" => DavMethod::Unlock,
            _ => DavMethod::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DavMethod::Options => "OPTIONS",
            DavMethod::Get => "GET",
            DavMethod::Head => "HEAD",
            DavMethod::Put => "PUT",
            DavMethod::Delete => "DELETE",
            DavMethod::PropFind => "PROPFIND",
            DavMethod::PropPatch => "PROPPATCH",
            DavMethod::MkCol => "MKCOL",
            DavMethod::Copy => "COPY",
            DavMethod::Move => "MOVE",
            DavMethod::Lock => "LOCK",
            DavMethod::Unlock => "UNLOCK",
            DavMethod::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DavMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Request {
    pub method: DavMethod,
    /// Request-URI exactly as sent (still percent-encoded).
    pub uri: String,
    pub version: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not an error: the buffer does not yet hold a complete request.
    #[error("request incomplete, more data required")]
    Incomplete,
    #[error("malformed request line")]
    BadRequestLine,
    #[error("invalid Content-Length header")]
    BadContentLength,
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

// Header values may contain printable ASCII plus tab; anything else gets
// the whole header dropped.
fn value_is_clean(value: &str) -> bool {
    value
        .bytes()
        .all(|b| (32..=126).contains(&b) || b == b'\t')
}

impl Request {
    /// Try to parse one request from the front of `buf`.
    ///
    /// Returns [`ParseError::Incomplete`] while the header terminator is
    /// missing or fewer than `Content-Length` body bytes have arrived; the
    /// caller reads more and retries.
    pub fn parse(buf: &[u8]) -> Result<Request, ParseError> {
        let header_end = find_header_end(buf).ok_or(ParseError::Incomplete)?;
        let head = String::from_utf8_lossy(&buf[..header_end]);
        let mut lines = head.lines();

        let request_line = lines.next().ok_or(ParseError::BadRequestLine)?;
        let mut tokens = request_line.split_ascii_whitespace();
        let (method, uri, version) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(m), Some(u), Some(v)) => (DavMethod::from_token(m), u, v),
            _ => return Err(ParseError::BadRequestLine),
        };
        if method == DavMethod::Unknown {
            log::error!("unknown HTTP method in request line: [{request_line}]");
        }

        let mut headers = HeaderMap::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let Some(colon) = line.find(':') else {
                continue;
            };
            let name = &line[..colon];
            let value = line[colon + 1..].trim();
            if !value_is_clean(value) {
                log::debug!("dropping header with unprintable value: {name}");
                continue;
            }
            let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
                log::debug!("dropping header with invalid name: [{name}]");
                continue;
            };
            let Ok(value) = HeaderValue::from_str(value) else {
                continue;
            };
            // last occurrence wins
            headers.insert(name, value);
        }

        let body_start = header_end + 4;
        let body = match headers.get(http::header::CONTENT_LENGTH) {
            None => Bytes::new(),
            Some(raw) => {
                let length: usize = raw
                    .to_str()
                    .ok()
                    .and_then(|s| s.trim().parse().ok())
                    .ok_or(ParseError::BadContentLength)?;
                if buf.len() < body_start + length {
                    return Err(ParseError::Incomplete);
                }
                Bytes::copy_from_slice(&buf[body_start..body_start + length])
            }
        };

        Ok(Request {
            method,
            uri: uri.to_owned(),
            version: version.to_owned(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_until_terminator() {
        assert_eq!(
            Request::parse(b"GET / HTTP/1.1\r\nHost: x\r\n").unwrap_err(),
            ParseError::Incomplete
        );
        assert_eq!(Request::parse(b"").unwrap_err(), ParseError::Incomplete);
    }

    #[test]
    fn simple_get() {
        let req = Request::parse(b"GET /a%20b HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
        assert_eq!(req.method, DavMethod::Get);
        assert_eq!(req.uri, "/a%20b");
        assert_eq!(req.version, "HTTP/1.1");
        assert_eq!(req.headers.get("host").unwrap(), "localhost");
        assert!(req.body.is_empty());
    }

    #[test]
    fn body_waits_for_content_length() {
        let partial = b"PUT /f HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel";
        assert_eq!(Request::parse(partial).unwrap_err(), ParseError::Incomplete);

        let full = b"PUT /f HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let req = Request::parse(full).unwrap();
        assert_eq!(&req.body[..], b"hello");
    }

    #[test]
    fn body_ignores_trailing_bytes() {
        let over = b"PUT /f HTTP/1.1\r\nContent-Length: 2\r\n\r\nhello";
        assert_eq!(&Request::parse(over).unwrap().body[..], b"he");
    }

    #[test]
    fn duplicate_header_last_wins() {
        let req =
            Request::parse(b"GET / HTTP/1.1\r\nDepth: 0\r\nDepth: 1\r\n\r\n").unwrap();
        assert_eq!(req.headers.get("depth").unwrap(), "1");
    }

    #[test]
    fn unprintable_header_dropped() {
        let raw = b"GET / HTTP/1.1\r\nX-Bad: a\x01b\r\nX-Good: ok\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert!(req.headers.get("x-bad").is_none());
        assert_eq!(req.headers.get("x-good").unwrap(), "ok");
    }

    #[test]
    fn value_whitespace_trimmed() {
        let req = Request::parse(b"GET / HTTP/1.1\r\nDestination:   http://h/x  \r\n\r\n")
            .unwrap();
        assert_eq!(req.headers.get("destination").unwrap(), "http://h/x");
    }

    #[test]
    fn unknown_method_parses() {
        let req = Request::parse(b"BREW /pot HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.method, DavMethod::Unknown);
    }

    #[test]
    fn garbage_request_line_rejected() {
        assert_eq!(
            Request::parse(b"GET\r\n\r\n").unwrap_err(),
            ParseError::BadRequestLine
        );
    }

    #[test]
    fn bad_content_length_rejected() {
        assert_eq!(
            Request::parse(b"PUT /f HTTP/1.1\r\nContent-Length: many\r\n\r\n").unwrap_err(),
            ParseError::BadContentLength
        );
    }

    #[test]
    fn webdav_method_tokens() {
        for (token, method) in [
            ("PROPFIND", DavMethod::PropFind),
            ("PROPPATCH", DavMethod::PropPatch),
            ("MKCOL", DavMethod::MkCol),
            ("COPY", DavMethod::Copy),
            ("MOVE", DavMethod::Move),
            ("LOCK", DavMethod::Lock),
            ("UNLOCK", DavMethod::Unlock),
        ] {
            assert_eq!(DavMethod::from_token(token), method);
            assert_eq!(method.as_str(), token);
        }
    }
}
