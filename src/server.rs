//! Parking service runtime.
//!
//! Wires configuration into a [`ParkingEngine`], installs tracing, and runs
//! the line-command loop over any async reader/writer pair (stdin/stdout for
//! the CLI, in-memory buffers in tests) until input ends or shutdown fires.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::application::ParkingEngine;
use crate::config::{AppConfig, ConfigError};
use crate::domain::{RegisterUser, SystemClock};
use crate::interfaces::command::{CommandDispatcher, OutputFormat};
use crate::support::shutdown::ShutdownSignal;

// ── Tracing ────────────────────────────────────────────────────────

/// Initialise the tracing subscriber from the logging config.
///
/// `RUST_LOG` takes precedence over `logging.level`. Output goes to stderr
/// so stdout stays reserved for command responses.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Options ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for starting the parking service.
pub struct ServerOptions {
    pub config: AppConfig,
    pub format: OutputFormat,
    /// Register the configured demo users (default: `demo.seed_users`).
    pub seed_demo_users: bool,
}

impl ServerOptions {
    pub fn new(config: AppConfig) -> Self {
        let seed_demo_users = config.demo.seed_users;
        Self {
            config,
            format: OutputFormat::Text,
            seed_demo_users,
        }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Build an engine on the system clock from `config`.
pub fn build_engine(config: &AppConfig, seed_demo_users: bool) -> Result<ParkingEngine, ServerError> {
    config.validate()?;
    let offset = config.analytics.offset()?;

    let mut engine = ParkingEngine::new(&config.layout.floors, config.tariff.clone(), SystemClock)
        .with_local_offset(offset);

    info!(
        total_slots = engine.total_slots(),
        utc_offset_minutes = config.analytics.utc_offset_minutes,
        currency = %config.tariff.currency,
        "Parking engine initialised"
    );

    if seed_demo_users {
        for user in &config.demo.users {
            if let Err(e) = engine.register(RegisterUser::from(user)) {
                warn!(plate = %user.plate, error = %e, "Skipping demo user");
            }
        }
        info!(users = engine.user_list().len(), "Demo users registered");
    }

    Ok(engine)
}

// ── ParkingServer ──────────────────────────────────────────────────

/// Line-command server around a single engine.
pub struct ParkingServer {
    dispatcher: CommandDispatcher,
    shutdown: ShutdownSignal,
}

impl ParkingServer {
    pub fn start(opts: ServerOptions, shutdown: ShutdownSignal) -> Result<Self, ServerError> {
        let engine = build_engine(&opts.config, opts.seed_demo_users)?;
        Ok(Self::with_engine(engine, opts.format, shutdown))
    }

    pub fn with_engine(engine: ParkingEngine, format: OutputFormat, shutdown: ShutdownSignal) -> Self {
        Self {
            dispatcher: CommandDispatcher::new(engine, format),
            shutdown,
        }
    }

    pub fn engine(&self) -> &ParkingEngine {
        self.dispatcher.engine()
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Serve commands until `reader` is exhausted or shutdown is triggered.
    /// Returns the number of responses written. Lines that are not valid
    /// UTF-8 are decoded lossily and answered like any other line.
    pub async fn run<R, W>(&mut self, mut reader: R, writer: &mut W) -> Result<u64, ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let shutdown = self.shutdown.clone();
        let mut buf = Vec::new();
        let mut responses = 0u64;

        info!(format = ?self.dispatcher.format(), "Accepting commands");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    info!("Shutdown requested, leaving command loop");
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => {
                    if read? == 0 {
                        info!("Input closed");
                        break;
                    }
                    let line = match String::from_utf8(std::mem::take(&mut buf)) {
                        Ok(line) => line,
                        Err(e) => {
                            warn!("Input line is not valid UTF-8");
                            String::from_utf8_lossy(e.as_bytes()).into_owned()
                        }
                    };
                    if let Some(response) = self.dispatcher.handle_line(&line) {
                        writer.write_all(response.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;
                        responses += 1;
                    }
                }
            }
        }

        info!(responses, "Command loop stopped");
        Ok(responses)
    }
}
