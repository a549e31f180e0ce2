//! Shopfront rental portal.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum fallback = front controller)
//!                         │  strip base path, decode query/body
//!                         ▼
//!                     routing::RouteTable::resolve ──▶ 404
//!                         │  HandlerRef + PathParams
//!                         ▼
//!                     dispatch::Dispatcher ──▶ 500 (resolution failure)
//!                         │
//!                         ▼
//!                     controllers::* ──▶ store (DashMap records, audit log)
//!                         │
//!     Client Response     ▼
//!     ◀────────────── http::response (view envelope, JSON, redirect)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use shopfront::config::{load_config, AppConfig};
use shopfront::lifecycle::{build_dispatcher, build_server, Shutdown};
use shopfront::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(about = "Commercial-property rental portal", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "config/shopfront.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print the route table in registration order
    Routes,
    /// Resolve a request offline and print the handler and parameters
    Resolve { method: String, path: String },
    /// Validate the config and resolve every handler, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::Routes => {
            let dispatcher = build_dispatcher(&config)?;
            for route in dispatcher.table().routes() {
                println!("{:<40} {}", route.key(), route.handler);
            }
        }
        Commands::Resolve { method, path } => {
            let dispatcher = build_dispatcher(&config)?;
            match dispatcher.resolve(&method.to_ascii_uppercase(), &path) {
                Ok(matched) => {
                    println!("{}", matched.handler);
                    for (name, value) in matched.params.iter() {
                        println!("  {name} = {value}");
                    }
                }
                Err(not_found) => {
                    eprintln!("{not_found}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Check => {
            let dispatcher = build_dispatcher(&config)?;
            println!(
                "{}: {} routes, all handlers resolved",
                cli.config.display(),
                dispatcher.table().len()
            );
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability)?;

    tracing::info!(
        name = %config.app.name,
        bind_address = %config.listener.bind_address,
        mode = %config.app.mode,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated on load.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = build_server(config)?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_ctrl_c());

    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
