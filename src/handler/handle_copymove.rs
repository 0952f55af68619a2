use headers::HeaderMapExt;
use http::StatusCode;
use log::{error, info};

use super::{destination_path, header_str};
use crate::fs::parent_path;
use crate::request::Request;
use crate::response::Response;
use crate::util::decode_url;

impl crate::DavHandler {
    pub(crate) async fn handle_copy(&self, req: &Request) -> Response {
        let src = decode_url(&req.uri);

        let Some(destination) = header_str(req, "destination") else {
            return Response::new(StatusCode::BAD_REQUEST);
        };
        let Some(dst) = destination_path(destination) else {
            error!("invalid destination URL: {destination}");
            return Response::new(StatusCode::BAD_REQUEST);
        };
        let dst = decode_url(dst);

        match self.fs.copy_resource(&src, &dst).await {
            Ok(()) => Response::new(StatusCode::CREATED),
            Err(err) => {
                error!("failed to copy {src} to {dst}: {err}");
                Response::new(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub(crate) async fn handle_move(&self, req: &Request) -> Response {
        let src = decode_url(&req.uri);
        info!("handling MOVE request for: {src}");

        let Some(destination) = header_str(req, "destination") else {
            error!("missing Destination header");
            return Response::new(StatusCode::BAD_REQUEST);
        };
        let Some(dst) = destination_path(destination) else {
            error!("invalid destination URL: {destination}");
            return Response::new(StatusCode::BAD_REQUEST);
        };
        let dst = decode_url(dst);
        info!("moving to path: {dst}");

        if self.fs.get_resource_info(&src).await.is_err() {
            error!("source does not exist: {src}");
            return Response::new(StatusCode::NOT_FOUND);
        }

        let dest_parent = parent_path(&dst);
        if self.fs.get_resource_info(dest_parent).await.is_err() {
            error!("destination parent directory does not exist: {dest_parent}");
            return Response::new(StatusCode::CONFLICT);
        }

        if let Err(err) = self.fs.move_resource(&src, &dst).await {
            error!("failed to move resource: {err}");
            return Response::new(StatusCode::INTERNAL_SERVER_ERROR);
        }

        let mut res = Response::new(StatusCode::CREATED);
        res.headers.typed_insert(headers::ContentLength(0));
        info!("move operation completed successfully");
        res
    }
}
