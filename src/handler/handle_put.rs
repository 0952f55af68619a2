use headers::HeaderMapExt;
use http::StatusCode;
use log::{error, info};

use crate::request::Request;
use crate::response::Response;
use crate::util::decode_url;

impl crate::DavHandler {
    pub(crate) async fn handle_put(&self, req: &Request) -> Response {
        let path = decode_url(&req.uri);
        info!("handling PUT request for: {path}");

        if req.headers.get(http::header::CONTENT_LENGTH).is_none() {
            error!("missing Content-Length header");
            return Response::new(StatusCode::LENGTH_REQUIRED);
        }

        // Decides 201 vs 204; must happen before the write replaces the
        // target.
        let existed = self.fs.get_resource_info(&path).await.is_ok();

        if let Err(err) = self.fs.write_file_atomic(&path, &req.body).await {
            error!("failed to store upload for {path}: {err}");
            return Response::new(StatusCode::INTERNAL_SERVER_ERROR);
        }

        let mut res = Response::new(if existed {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::CREATED
        });
        res.headers.typed_insert(headers::ContentLength(0));

        info!(
            "file uploaded successfully: {path} (size: {} bytes)",
            req.body.len()
        );
        res
    }
}
