//! temploco server binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request id, trace, timeout)
//!                         │
//!                         ▼
//!                     routing::RouterTable::dispatch
//!                         │  first matching entry, path params
//!                         ▼
//!                     layouts (outermost first) ──▶ LayoutFragment fold
//!                         │
//!                         ▼
//!                     view ──▶ content | deferred | bypass
//!                         │
//!     Client Response     ▼
//!     ◀────────────── http::response
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use temploco::config::{load_config, validate_config, AppConfig, ConfigError};
use temploco::contacts::{self, MemoryContactStore};
use temploco::http::HttpServer;
use temploco::observability::{init_logging, metrics};

#[derive(Parser)]
#[command(name = "temploco")]
#[command(about = "Contacts demo served through layout-composing routes", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the contacts application (default)
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Validate configuration and the route tree, then exit
    Check,
    /// Print the compiled route table
    Routes,
    /// Build the URL of a named route
    Reverse {
        name: String,
        /// Parameters as KEY=VALUE
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))
}

fn read_config(path: Option<&PathBuf>, bind: Option<String>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { bind: None });

    let bind = match &command {
        Commands::Serve { bind } => bind.clone(),
        _ => None,
    };
    let config = read_config(cli.config.as_ref(), bind)?;

    // Before compiling, so route compilation logs reach the subscriber.
    if matches!(command, Commands::Serve { .. }) {
        init_logging(&config.observability)?;
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "temploco starting");
    }

    let store = Arc::new(MemoryContactStore::new());
    let table = contacts::application(&config.routing, store)?;

    match command {
        Commands::Check => {
            println!("configuration ok, {} routes", table.len());
            return Ok(());
        }
        Commands::Routes => {
            for entry in table.entries() {
                println!(
                    "{:<20} {:<32} layouts={}",
                    entry.label(),
                    entry.pattern().as_str(),
                    entry.layout_count()
                );
            }
            return Ok(());
        }
        Commands::Reverse { name, params } => {
            println!("{}", table.reverse(&name, params)?);
            return Ok(());
        }
        Commands::Serve { .. } => {}
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        layout_scope = ?config.routing.layout_scope,
        routes = table.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config, Arc::new(table));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
