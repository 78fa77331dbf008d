//! School29: CLI server
//!
//! ```sh
//! # Default config (~/.config/school29/config.toml, or $SCHOOL29_CONFIG)
//! school29-service
//!
//! # Custom config and port
//! school29-service --config /etc/school29/config.toml --port 8080
//!
//! # Validate config without starting
//! school29-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use school29::config::AppConfig;
use school29::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "school29-service",
    version,
    about = "School29 school administration API server",
    long_about = "School29 REST API: accounts with admin approval, classes, news, \
                  schedules and analytics.\n\n\
                  Default config: ~/.config/school29/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SCHOOL29_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the bootstrap admin account.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(school29::default_config_path);

    let mut config = match AppConfig::load_with_env(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration ({}): {}", config_path.display(), e);
            std::process::exit(2);
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Token alg   : {}", config.security.algorithm);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
