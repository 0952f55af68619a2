//! Fatal setup errors surfaced by the binary.
//!
//! Per-request failures never reach this type: handlers translate backend
//! and parse errors straight into HTTP status codes.

#[derive(Debug, thiserror::Error)]
pub enum DavError {
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("logger setup failed: {0}")]
    Logger(#[from] crate::logger::InitError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
