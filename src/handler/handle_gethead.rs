use bytes::Bytes;
use http::header;
use http::StatusCode;
use log::error;

use crate::mime;
use crate::request::Request;
use crate::response::Response;
use crate::util::decode_url;

impl crate::DavHandler {
    pub(crate) async fn handle_get(&self, req: &Request) -> Response {
        let path = decode_url(&req.uri);

        let info = match self.fs.get_resource_info(&path).await {
            Ok(info) => info,
            Err(_) => return Response::new(StatusCode::NOT_FOUND),
        };

        if info.is_directory {
            let mut res = Response::new(StatusCode::MOVED_PERMANENTLY);
            res.insert_header(header::LOCATION, &format!("{}/", req.uri));
            return res;
        }

        let data = match self.fs.read_file(&path).await {
            Ok(data) => data,
            Err(err) => {
                error!("failed to read {path}: {err}");
                return Response::new(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        let mut res = Response::new(StatusCode::OK);
        res.headers.insert(
            header::CONTENT_TYPE,
            http::HeaderValue::from_static(mime::mime_type(&path)),
        );
        res.insert_header(header::ETAG, &info.etag);
        // Epoch seconds rather than an HTTP-date (see DESIGN.md).
        res.insert_header(header::LAST_MODIFIED, &info.modified.to_string());
        res.set_body(data);
        res
    }

    pub(crate) async fn handle_head(&self, req: &Request) -> Response {
        let mut res = self.handle_get(req).await;
        res.body = Bytes::new();
        res
    }
}
