//! Appdock RPC Server - JSON-RPC backend for the desktop frontend.
//!
//! This binary provides a JSON-RPC 2.0 server that wraps the appdock-library
//! launcher registry for communication with the Electron main process.

mod handler;
mod server;

use anyhow::Result;
use appdock_library::{platform, IconCache, LauncherRegistry};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "appdock-rpc")]
#[command(about = "JSON-RPC server for Appdock")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Launcher descriptor directory (defaults to the platform applications dir)
    #[arg(long)]
    apps_dir: Option<PathBuf>,

    /// Icon cache directory (defaults to the platform data dir)
    #[arg(long)]
    icon_cache_dir: Option<PathBuf>,

    /// Skip the startup icon prefetch
    #[arg(long)]
    no_icon_prefetch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!("Starting Appdock RPC Server");

    let registry = match args.apps_dir {
        Some(dir) => LauncherRegistry::with_apps_dir(dir),
        None => LauncherRegistry::new()?,
    };
    info!("Descriptor directory: {}", registry.apps_dir().display());

    let icon_cache_dir = match args.icon_cache_dir {
        Some(dir) => dir,
        None => platform::icon_cache_dir()?,
    };
    let icon_cache = IconCache::new(&icon_cache_dir)?;

    // Opportunistic prefetch of known icons; failures never block startup
    if !args.no_icon_prefetch {
        let cache = icon_cache.clone();
        tokio::spawn(async move {
            cache.ensure_known_icons().await;
        });
    } else {
        warn!("Icon prefetch disabled");
    }

    // Start the server
    let addr = server::start_server(registry, icon_cache, &args.host, args.port).await?;

    // Print port for the frontend to read (intentional stdout for IPC)
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
