//! Parking Service CLI
//!
//! Reads line commands from stdin and writes one response per line to
//! stdout. Logs go to stderr.
//!
//! ```sh
//! # Run with default config (~/.config/parking-service/config.toml)
//! parking-service
//!
//! # Custom config path, JSON responses
//! parking-service --config /etc/parking-service/config.toml --format json
//!
//! # Validate config without starting
//! parking-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use parking_service::config::AppConfig;
use parking_service::interfaces::command::OutputFormat;
use parking_service::server::{init_tracing, ParkingServer, ServerOptions};
use parking_service::support::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

/// Parking Service: slot allocation and billing for a multi-floor garage.
#[derive(Parser, Debug)]
#[command(
    name = "parking-service",
    version,
    about = "Line-command parking allocation and billing service",
    long_about = "Parking Service reads commands such as PARK, REMOVE and STATUS \
                  from stdin and answers on stdout.\n\n\
                  Default config: ~/.config/parking-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Response format: text or json.
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Do not register the demo users from the config.
    #[arg(long)]
    no_demo_users: bool,

    /// Validate the configuration file, print the effective config and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(parking_service::default_config_path);

    let loaded = AppConfig::load(&config_path);

    if cli.check {
        let config = loaded?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!();
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let config = match loaded {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            if let Some(ref level) = cli.log_level {
                info!("CLI override: log_level = {}", level);
            }
            cfg
        }
        Err(e) => {
            // Fallback tracing init
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(tracing_subscriber::EnvFilter::new(
                    cli.log_level.as_deref().unwrap_or("info"),
                ))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Start server ───────────────────────────────────────────
    let mut opts = ServerOptions::new(config);
    opts.format = cli.format;
    if cli.no_demo_users {
        opts.seed_demo_users = false;
    }

    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    let mut server = ParkingServer::start(opts, shutdown)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    server.run(stdin, &mut stdout).await?;

    // The blocking stdin read may still be pending and would keep the
    // runtime from shutting down.
    std::process::exit(0)
}
