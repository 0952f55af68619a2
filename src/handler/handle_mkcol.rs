use http::StatusCode;
use log::debug;

use crate::request::Request;
use crate::response::Response;
use crate::util::decode_url;

impl crate::DavHandler {
    pub(crate) async fn handle_mkcol(&self, req: &Request) -> Response {
        let path = decode_url(&req.uri);

        match self.fs.create_directory(&path).await {
            Ok(()) => Response::new(StatusCode::CREATED),
            Err(err) => {
                debug!("mkcol failed for {path}: {err}");
                Response::new(StatusCode::CONFLICT)
            }
        }
    }
}
