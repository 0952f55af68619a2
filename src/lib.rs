//! ## WebDAV server for a local directory tree
//!
//! [`Webdav`] (RFC 4918, class 1/2) is HTTP (GET/HEAD/PUT/DELETE) plus a
//! set of extension methods (PROPFIND, MKCOL, COPY, MOVE, ...) used to
//! manage collections, list them, query properties, and rename or copy
//! items. Linux, Windows and macOS can all mount a WebDAV share as a
//! remote filesystem.
//!
//! This crate is a complete, self-contained server: it owns the listening
//! socket and HTTP/1.1 framing, dispatches the WebDAV verbs against a
//! path-confined local filesystem backend, and renders `multistatus`
//! bodies through a small DOM-style XML layer. Authentication is HTTP
//! Basic over an in-memory user store (currently advisory; see DESIGN.md).
//!
//! ## Layout
//!
//! - [`server`]: listener, accept loop, keep-alive connection workers.
//! - [`request`] / [`response`]: HTTP framing and serialisation.
//! - [`handler`]: one submodule per WebDAV verb.
//! - [`fs`]: the filesystem backend with its metadata cache and per-path
//!   write serialisation.
//! - [`xml`], [`mime`], [`base64`], [`auth`], [`logger`]: supporting
//!   layers.
//!
//! ## Example
//!
//! Serve `/tmp` on port 4918:
//!
//! ```no_run
//! use webdav_server::{DavServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), webdav_server::DavError> {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".into(),
//!         port: 4918,
//!         root: "/tmp".into(),
//!     };
//!     let server = DavServer::bind(&config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! [`Webdav`]: http://www.webdav.org/specs/rfc4918.html

pub mod auth;
pub mod base64;
mod errors;
pub mod fs;
pub mod handler;
pub mod logger;
pub mod mime;
pub mod request;
pub mod response;
pub mod server;
pub mod util;
pub mod xml;

pub use crate::errors::DavError;
pub use crate::handler::DavHandler;
pub use crate::request::{DavMethod, Request};
pub use crate::response::Response;
pub use crate::server::{DavServer, ServerConfig, ShutdownHandle};
