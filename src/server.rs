//! TCP server: listener setup, accept loop, and the per-connection worker.
//!
//! One task per live connection. Requests on a connection are served
//! strictly in arrival order; the socket stays open between requests
//! (keep-alive) until the client closes it, a read/write fails or times
//! out, or a request proves unparseable.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use http::StatusCode;
use log::{debug, error, info};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::auth::AuthStore;
use crate::errors::DavError;
use crate::fs::LocalBackend;
use crate::handler::DavHandler;
use crate::request::{ParseError, Request};
use crate::response::Response;

const READ_BUF_SIZE: usize = 8 * 1024;
const SOCKET_BUF_SIZE: usize = 1024 * 1024;
const IO_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".into(),
            port: 8080,
            root: "./webdav_root".into(),
        }
    }
}

pub struct DavServer {
    handler: Arc<DavHandler>,
    listener: TcpListener,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Flips the shutdown flag watched by the accept loop.
#[derive(Clone)]
pub struct ShutdownHandle(watch::Sender<bool>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.0.send(true);
    }
}

impl DavServer {
    /// Bind the listening socket (`SO_REUSEADDR`, OS-maximum backlog) and
    /// assemble the backend and handler.
    pub async fn bind(config: &ServerConfig) -> Result<DavServer, DavError> {
        info!("starting server on {}:{}", config.host, config.port);

        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(libc::SOMAXCONN as u32)?;

        let fs = Arc::new(LocalBackend::new(&config.root));
        let auth = Arc::new(AuthStore::new());
        let handler = Arc::new(DavHandler::new(fs, auth));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!("server started successfully");
        Ok(DavServer {
            handler,
            listener,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// The bound address; useful when the configured port was 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.shutdown_tx.clone())
    }

    /// Accept until shutdown, then wait for in-flight connections to
    /// drain. Finished workers are reaped opportunistically as new
    /// connections arrive.
    pub async fn run(mut self) -> std::io::Result<()> {
        let mut workers: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            info!("new connection from {peer}");
                            configure_client_socket(&stream);
                            let handler = self.handler.clone();
                            workers.spawn(handle_client(handler, stream));
                            while workers.try_join_next().is_some() {}
                        }
                        Err(err) => {
                            error!("failed to accept connection: {err}");
                        }
                    }
                }
            }
        }

        drop(self.listener);
        while workers.join_next().await.is_some() {}
        info!("server stopped");
        Ok(())
    }
}

fn configure_client_socket(stream: &TcpStream) {
    if let Err(err) = stream.set_nodelay(true) {
        debug!("failed to set TCP_NODELAY: {err}");
    }
    let sock = socket2::SockRef::from(stream);
    if let Err(err) = sock.set_keepalive(true) {
        debug!("failed to set SO_KEEPALIVE: {err}");
    }
    let _ = sock.set_recv_buffer_size(SOCKET_BUF_SIZE);
    let _ = sock.set_send_buffer_size(SOCKET_BUF_SIZE);
}

/// Per-connection worker: accumulate 8 KiB reads until a request parses,
/// dispatch it, write the response in one call, then clear the buffer for
/// the next request on the same socket.
async fn handle_client(handler: Arc<DavHandler>, mut stream: TcpStream) {
    let mut acc = BytesMut::with_capacity(READ_BUF_SIZE);
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        let request = loop {
            match Request::parse(&acc) {
                Ok(request) => break request,
                Err(ParseError::Incomplete) => {}
                Err(err) => {
                    error!("failed to parse request: {err}");
                    send_error_response(&mut stream, StatusCode::BAD_REQUEST).await;
                    return;
                }
            }

            match tokio::time::timeout(IO_TIMEOUT, stream.read(&mut buf)).await {
                Ok(Ok(0)) => {
                    debug!("client closed connection normally");
                    return;
                }
                Ok(Ok(n)) => acc.extend_from_slice(&buf[..n]),
                Ok(Err(err)) => {
                    error!("receive error: {err}");
                    return;
                }
                Err(_) => {
                    debug!("client receive timed out");
                    return;
                }
            }
        };

        let response = handler.handle(&request).await;
        let bytes = response.to_bytes();
        match tokio::time::timeout(IO_TIMEOUT, stream.write_all(&bytes)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!("send error: {err}");
                return;
            }
            Err(_) => {
                debug!("client send timed out");
                return;
            }
        }

        acc.clear();
    }
}

async fn send_error_response(stream: &mut TcpStream, status: StatusCode) {
    let mut response = Response::new(status);
    response
        .headers
        .insert(http::header::CONTENT_LENGTH, "0".parse().unwrap());
    let _ = tokio::time::timeout(IO_TIMEOUT, stream.write_all(&response.to_bytes())).await;
}
