//
// This module contains the request dispatcher, DavHandler.
//
// One submodule per WebDAV verb; each handler receives the parsed request
// and produces the complete response, mapping backend failures to the
// protocol's status codes.
//

use std::sync::Arc;

use http::StatusCode;
use log::{error, info};

use crate::auth::AuthStore;
use crate::fs::LocalBackend;
use crate::request::{DavMethod, Request};
use crate::response::Response;

pub mod handle_copymove;
pub mod handle_delete;
pub mod handle_gethead;
pub mod handle_lock;
pub mod handle_mkcol;
pub mod handle_options;
pub mod handle_props;
pub mod handle_put;

#[derive(Clone)]
pub struct DavHandler {
    pub(crate) fs: Arc<LocalBackend>,
    pub(crate) auth: Arc<AuthStore>,
}

impl DavHandler {
    pub fn new(fs: Arc<LocalBackend>, auth: Arc<AuthStore>) -> DavHandler {
        DavHandler { fs, auth }
    }

    /// Dispatch one request. Verbs without a handler (UNLOCK included) get
    /// a 501.
    pub async fn handle(&self, req: &Request) -> Response {
        info!("handling request: {} for URI: {}", req.method, req.uri);

        match req.method {
            DavMethod::Options => self.handle_options(req).await,
            DavMethod::Get => self.handle_get(req).await,
            DavMethod::Head => self.handle_head(req).await,
            DavMethod::Put => self.handle_put(req).await,
            DavMethod::Delete => self.handle_delete(req).await,
            DavMethod::MkCol => self.handle_mkcol(req).await,
            DavMethod::Copy => self.handle_copy(req).await,
            DavMethod::Move => self.handle_move(req).await,
            DavMethod::PropFind => self.handle_propfind(req).await,
            DavMethod::PropPatch => self.handle_proppatch(req).await,
            DavMethod::Lock => self.handle_lock(req).await,
            DavMethod::Unlock | DavMethod::Unknown => {
                error!("unhandled method: {}", req.method);
                Response::new(StatusCode::NOT_IMPLEMENTED)
            }
        }
    }

    /// Verify Basic credentials against the auth store.
    ///
    /// Note that dispatch does not call this: the server currently
    /// answers unauthenticated requests. See DESIGN.md before wiring it
    /// in.
    pub fn authenticate(&self, req: &Request) -> bool {
        let Some(value) = header_str(req, "authorization") else {
            return false;
        };
        let Some(encoded) = value.strip_prefix("Basic ") else {
            return false;
        };
        let decoded = crate::base64::decode(encoded);
        let credentials = String::from_utf8_lossy(&decoded);
        let Some((username, password)) = credentials.split_once(':') else {
            return false;
        };
        self.auth.authenticate(username, password)
    }
}

/// A header value as text, if present and readable.
pub(crate) fn header_str<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Extract the path portion of a `Destination` URI: skip scheme and host,
/// start at the first `/` after `://`. A value that is already a bare
/// absolute path is taken as-is.
pub(crate) fn destination_path(destination: &str) -> Option<&str> {
    match destination.find("://") {
        Some(idx) => {
            let rest = &destination[idx + 3..];
            rest.find('/').map(|slash| &rest[slash..])
        }
        None if destination.starts_with('/') => Some(destination),
        None => None,
    }
}
