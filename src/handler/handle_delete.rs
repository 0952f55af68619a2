use http::StatusCode;
use log::debug;

use crate::request::Request;
use crate::response::Response;
use crate::util::decode_url;

impl crate::DavHandler {
    pub(crate) async fn handle_delete(&self, req: &Request) -> Response {
        let path = decode_url(&req.uri);

        match self.fs.delete_resource(&path).await {
            Ok(()) => Response::new(StatusCode::NO_CONTENT),
            Err(err) => {
                debug!("delete failed for {path}: {err}");
                Response::new(StatusCode::NOT_FOUND)
            }
        }
    }
}
