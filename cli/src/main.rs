//! Grocery store backend server
//!
//! ```sh
//! # Run with default config (~/.config/grocery-store/config.toml)
//! grocery-store
//!
//! # Custom config path
//! grocery-store --config /etc/grocery-store/config.toml
//!
//! # Override the port
//! grocery-store --port 8080
//!
//! # Validate config without starting
//! grocery-store --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use grocery_store::config::{AppConfig, ConfigError};
use grocery_store::server::{init_tracing, ServerHandle, ServerOptions};

/// Grocery store backend: users, CSV product import, product search.
#[derive(Parser, Debug)]
#[command(
    name = "grocery-store",
    version,
    about = "Grocery store REST backend",
    long_about = "Grocery store REST backend: user accounts with admin/client roles, \
                  bulk product import from CSV and product search with reviews.\n\n\
                  Default config: ~/.config/grocery-store/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "GROCERY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(grocery_store::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(ConfigError::Io { .. }) if !config_path.exists() => {
            let mut cfg = AppConfig::default();
            cfg.apply_env_overrides();
            (cfg, Some(format!("{} not found", config_path.display())))
        }
        Err(e) => return Err(format!("{}: {}", config_path.display(), e).into()),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        if load_error.is_some() {
            println!("               (not found, defaults in use)");
        }
        println!("   Address     : {}", config.address());
        println!("   Database    : {}", config.database.url);
        println!("   Uploads     : {}", config.uploads.dir.display());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config.logging);
    match load_error {
        Some(reason) => warn!("{}; using default configuration", reason),
        None => info!("Configuration loaded from {}", config_path.display()),
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
