use headers::HeaderMapExt;
use http::StatusCode;

use crate::request::Request;
use crate::response::Response;
use crate::util::now_epoch;

impl crate::DavHandler {
    // Just enough LOCK support for clients that insist on locking before a
    // write: a synthetic token is issued and never tracked. UNLOCK is not
    // implemented and falls through to 501 in dispatch.
    pub(crate) async fn handle_lock(&self, _req: &Request) -> Response {
        let mut res = Response::new(StatusCode::OK);
        res.headers.insert(
            http::header::CONTENT_TYPE,
            "application/xml; charset=\"utf-8\"".parse().unwrap(),
        );
        res.insert_header(
            http::header::HeaderName::from_static("lock-token"),
            &format!("<opaquelocktoken:{}>", now_epoch()),
        );
        res.headers.typed_insert(headers::ContentLength(0));
        res
    }
}
