use std::io::ErrorKind;

use clap::Parser;
use log::{error, info, LevelFilter};

use webdav_server::logger;
use webdav_server::{DavServer, ServerConfig};

#[derive(Debug, clap::Parser)]
#[command(name = "webdav_server", about = "WebDAV server", version)]
struct Cli {
    /// Server host address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Server port
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Root directory path
    #[arg(long, default_value = "./webdav_root")]
    root: String,
}

async fn wait_for_signal() -> i32 {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => libc::SIGINT,
                _ = sigterm.recv() => libc::SIGTERM,
            }
        }
        Err(err) => {
            error!("failed to install SIGTERM handler: {err}");
            let _ = tokio::signal::ctrl_c().await;
            libc::SIGINT
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = std::fs::create_dir("logs") {
        if err.kind() != ErrorKind::AlreadyExists {
            eprintln!("Failed to create logs directory: {err}");
        }
    }
    if let Err(err) = logger::init("logs/webdav.log", LevelFilter::Info) {
        eprintln!("Failed to set up logging: {err}");
        std::process::exit(1);
    }

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        root: cli.root,
    };
    let server = match DavServer::bind(&config).await {
        Ok(server) => server,
        Err(err) => {
            eprintln!("Failed to start server: {err}");
            std::process::exit(1);
        }
    };
    let shutdown = server.shutdown_handle();
    let server_task = tokio::spawn(server.run());

    println!("WebDAV server started on {}:{}", config.host, config.port);
    println!("Root directory: {}", config.root);
    println!("Press Ctrl+C to stop the server");

    let signum = wait_for_signal().await;
    info!("stopping server...");
    shutdown.shutdown();
    if let Ok(Err(err)) = server_task.await {
        error!("server shut down with error: {err}");
    }

    std::process::exit(signum);
}
