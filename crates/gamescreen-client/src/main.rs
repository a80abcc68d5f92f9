//! GameScreen remote display client: entry point.
//!
//! Connects to a GameScreen peer, keeps the latest frame painted (optionally
//! mirrored to a PNG file), and forwards joypad input typed on stdin.
//!
//! # Usage
//!
//! ```text
//! gamescreen-client [OPTIONS]
//!
//! Options:
//!   --config <PATH>          Config file [default: platform config dir]
//!   --host <HOST>            Peer host name or address
//!   --ws-port <PORT>         Frame stream port [default: 1148]
//!   --http-port <PORT>       Input endpoint port [default: 8282]
//!   --queue-capacity <N>     Input events allowed to wait [default: 64]
//!   --snapshot <PATH>        Write the surface to this PNG after each paint
//!   --log-level <LEVEL>      Used when RUST_LOG is unset [default: info]
//!   --print-config           Print the effective config as TOML and exit
//!   --write-config           Save the effective config to the config file and exit
//! ```
//!
//! Every option can also be set through a `GAMESCREEN_*` environment
//! variable.  Precedence: command line, then environment, then config file,
//! then built-in defaults.
//!
//! # Input
//!
//! One key transition per stdin line, e.g. `down KeyA` / `up KeyA`.
//! `quit` or end of input stops the client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gamescreen_client::application::ClientRuntime;
use gamescreen_client::domain::config::{default_config_path, load_config, save_config};
use gamescreen_client::domain::ClientConfig;
use gamescreen_client::infrastructure::key_source::read_keys;
use gamescreen_client::infrastructure::HttpInputEndpoint;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// GameScreen remote display client.
#[derive(Debug, Parser)]
#[command(
    name = "gamescreen-client",
    about = "Remote display and joypad client for a GameScreen peer",
    version
)]
struct Cli {
    /// Config file.  Missing file means built-in defaults.
    #[arg(long, env = "GAMESCREEN_CONFIG")]
    config: Option<PathBuf>,

    /// Peer host name or address.  A `:port` suffix is ignored.
    #[arg(long, env = "GAMESCREEN_HOST")]
    host: Option<String>,

    /// Websocket frame stream port.
    #[arg(long, env = "GAMESCREEN_WS_PORT")]
    ws_port: Option<u16>,

    /// HTTP input endpoint port.
    #[arg(long, env = "GAMESCREEN_HTTP_PORT")]
    http_port: Option<u16>,

    /// Input events allowed to wait behind the in-flight request.
    #[arg(long, env = "GAMESCREEN_QUEUE_CAPACITY")]
    queue_capacity: Option<usize>,

    /// Write the visible surface to this PNG file after each paint.
    #[arg(long, env = "GAMESCREEN_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, env = "GAMESCREEN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,

    /// Save the effective configuration to the config file and exit.
    #[arg(long, conflicts_with = "print_config")]
    write_config: bool,
}

impl Cli {
    /// `--config`, else the platform default.  `None` when neither exists
    /// (no `HOME` / `APPDATA`).
    fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| default_config_path().ok())
    }

    /// Loads the config file at `path` (defaults when `None` or missing) and
    /// applies command-line overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn client_config(&self, path: Option<&Path>) -> anyhow::Result<ClientConfig> {
        let mut config = match path {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ClientConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.network.host = host.clone();
        }
        if let Some(port) = self.ws_port {
            config.network.ws_port = port;
        }
        if let Some(port) = self.http_port {
            config.network.http_port = port;
        }
        if let Some(capacity) = self.queue_capacity {
            config.input.queue_capacity = capacity;
        }
        if let Some(path) = &self.snapshot {
            config.display.snapshot_path = path.display().to_string();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli.config_path();
    let config = cli.client_config(path.as_deref())?;

    if cli.print_config {
        print!(
            "{}",
            toml::to_string_pretty(&config).context("failed to serialize config")?
        );
        return Ok(());
    }
    if cli.write_config {
        let path = path.context("no config path: pass --config")?;
        save_config(&path, &config)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    if path.is_none() {
        warn!("no platform config directory; using built-in defaults");
    }
    info!(
        "GameScreen client starting: frames={}, input={}",
        config.ws_url(),
        config.http_base_url()
    );

    let endpoint = HttpInputEndpoint::new(config.http_base_url(), config.request_timeout())
        .context("failed to build HTTP client")?;
    let runtime = ClientRuntime::new(&config, Arc::new(endpoint));
    let handle = runtime.handle();

    // ── Key source ────────────────────────────────────────────────────────────
    //
    // Stdin is read on a plain thread: a blocked read must not keep the
    // runtime from shutting down.
    let (keys_tx, mut keys_rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("gamescreen-stdin".to_string())
        .spawn(move || {
            if let Err(e) = read_keys(std::io::stdin().lock(), keys_tx) {
                error!("failed to read key input: {e}");
            }
        })
        .context("failed to start key input thread")?;
    let key_handle = handle.clone();
    tokio::spawn(async move {
        while let Some(input) = keys_rx.recv().await {
            if key_handle.key(input).is_err() {
                break;
            }
        }
    });

    // ── Ctrl+C ────────────────────────────────────────────────────────────────
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                let _ = handle.shutdown();
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    let controller = runtime.run().await;
    let stats = controller.stats();
    info!(
        "GameScreen client stopped: {} frames painted, {} rejected, {} input requests ({} failed)",
        stats.frames_rendered, stats.frames_rejected, stats.requests_sent, stats.requests_failed
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
