//! go-import service.
//!
//! Answers `?go-get=1` discovery requests for a code-hosting server and
//! forwards all other traffic to it.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ timeout ─▶ go-get? ──yes──▶ resolver ─▶ page
//!                                                          │
//!                                                          no
//!                                                          ▼
//!                                                      upstream (or 404)
//! ```

use std::path::PathBuf;

use clap::Parser;

use go_import::config::{load_config, ConfigWatcher};
use go_import::lifecycle::{self, Shutdown};
use go_import::observability::logging;

#[derive(Parser)]
#[command(name = "go-import")]
#[command(about = "go-get discovery for nested repository names", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "go-import.toml")]
    config: PathBuf,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Do not reload repositories when the config file changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    if cli.check {
        println!("{}: OK ({} repositories)", cli.config.display(), config.repositories.len());
        return Ok(());
    }

    logging::init_logging(&config.observability.log_level)?;
    tracing::info!("go-import v{} starting", env!("CARGO_PKG_VERSION"));

    let (server, listener) = lifecycle::start(&config).await?;

    let (watcher, config_updates) = ConfigWatcher::new(&cli.config);
    let _watch_handle = if cli.no_watch {
        None
    } else {
        Some(watcher.run()?)
    };

    let shutdown = Shutdown::new();
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
