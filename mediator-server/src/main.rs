//! Mediator server: entry point.
//!
//! ```text
//! mediator                    Run with ./mediator.toml (or defaults)
//! mediator --config <path>    Load a custom config TOML
//! mediator --gen-config       Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mediator_server::config::ServerConfig;
use mediator_server::service::MediatorService;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mediator", about = "Remote desktop control over HTTP")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "mediator.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        println!("{}", ServerConfig::default_toml()?);
        return Ok(());
    }

    // Load config.
    let config = ServerConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("mediator v{}", env!("CARGO_PKG_VERSION"));
    info!("base path: {}", config.files.base_path.display());
    info!("web root: {}", config.files.web_root.display());
    info!(
        "screen: quality {} at up to {} fps",
        config.screen.quality, config.screen.fps
    );

    let service = MediatorService::new(config);
    service
        .run(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Ctrl-C received, shutting down");
        })
        .await?;

    Ok(())
}
