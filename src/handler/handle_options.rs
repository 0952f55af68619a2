use headers::HeaderMapExt;
use http::StatusCode;

use crate::request::Request;
use crate::response::Response;
use crate::util::{epoch_to_httpdate, now_epoch};

const ALLOW: &str =
    "OPTIONS, GET, HEAD, PUT, DELETE, MKCOL, COPY, MOVE, PROPFIND, PROPPATCH, LOCK, UNLOCK";

impl crate::DavHandler {
    pub(crate) async fn handle_options(&self, _req: &Request) -> Response {
        let mut res = Response::new(StatusCode::OK);

        let h = &mut res.headers;
        h.insert("allow", ALLOW.parse().unwrap());
        h.insert("dav", "1, 2".parse().unwrap());
        h.insert("ms-author-via", "DAV".parse().unwrap());
        h.insert("accept-ranges", "bytes".parse().unwrap());
        h.typed_insert(headers::ContentLength(0));

        // Windows WebDAV clients expect these.
        h.insert("connection", "Keep-Alive".parse().unwrap());
        h.insert("keep-alive", "timeout=5, max=100".parse().unwrap());
        h.insert("public", ALLOW.parse().unwrap());
        h.insert("server", "WebDAV/1.0".parse().unwrap());
        h.insert("x-server-type", "WebDAV".parse().unwrap());
        h.insert("x-webdav-status", "Ready".parse().unwrap());
        res.insert_header(http::header::DATE, &epoch_to_httpdate(now_epoch() as i64));

        res
    }
}
