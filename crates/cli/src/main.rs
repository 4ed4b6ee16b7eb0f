//! carsearch CLI — search the used-cars API from the terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use carsearch_core::render::{format_elapsed, page_document, SearchForm};
use carsearch_core::{
    algorithm_name, format_price, load_client_config, CarRecord, ClientConfig, HttpBackend,
    MemoryPage, PageHandles, SearchBackend, SearchController, SearchMethod, SearchRequest,
};
use carsearch_http::AppContext;

/// carsearch CLI — query the used-cars search API.
#[derive(Parser)]
#[command(name = "cars", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Backend base URL (overrides .carsearch.toml and CARSEARCH_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory containing .carsearch.toml (default: current directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings by brand or model
    Search {
        /// Search query
        query: String,

        /// Search method: sequential, indexed, or hash
        #[arg(long, short, default_value = "sequential")]
        method: String,

        /// Render the full HTML page instead of a table
        #[arg(long)]
        html: bool,

        /// Write HTML output to a file instead of stdout
        #[arg(long, requires = "html")]
        out: Option<PathBuf>,
    },
    /// Browse the full catalog page by page
    Catalog {
        /// Page number (1-indexed)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Listings per page (default: catalog_per_page from config)
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// List the available search methods
    Methods,
    /// Serve the search page over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1
        #[arg(long)]
        bind_all: bool,
    },
}

fn resolve_config(config_dir: Option<PathBuf>, base_url: Option<&str>) -> ClientConfig {
    let dir = match config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().unwrap_or_else(|e| {
            eprintln!("Could not determine current directory: {e}");
            std::process::exit(1);
        }),
    };
    let mut config = load_client_config(&dir);
    config.apply_base_url_override(base_url);
    config
}

fn build_backend(config: &ClientConfig) -> HttpBackend {
    HttpBackend::from_config(config).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    })
}

fn print_table(cars: &[CarRecord]) {
    for car in cars {
        println!("{:<16} {:<28} {:>6} {:>18}", car.brand, car.model, car.year, format_price(car.price));
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Could not serialize output: {e}");
        std::process::exit(1);
    })
}

// ---------------------------------------------------------------------------
// Graceful shutdown signal
// ---------------------------------------------------------------------------

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received SIGINT, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                error!(error = %e, "Could not register SIGTERM handler");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("Received Ctrl+C, shutting down...");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "carsearch=info"
    } else {
        "carsearch=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().expect("static directive")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(cli.config_dir, cli.base_url.as_deref());

    match cli.command {
        Commands::Search { query, method, html: true, out } => {
            let page = Arc::new(MemoryPage::new());
            let controller = SearchController::with_policy(
                build_backend(&config),
                PageHandles::memory(&page),
                config.stale_policy,
            );
            controller.perform_search(&method, &query).await;

            let document = page_document(&page.snapshot(), &SearchForm { method, query });
            match out {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, document) {
                        eprintln!("Could not write {}: {e}", path.display());
                        std::process::exit(1);
                    }
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{document}"),
            }
        }
        Commands::Search { query, method, html: false, .. } => {
            let backend = build_backend(&config);
            let start = Instant::now();
            let response = match backend.search(&SearchRequest::new(method.as_str(), query.as_str())).await {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Erro ao realizar busca: {e}");
                    std::process::exit(1);
                }
            };
            let elapsed = start.elapsed();

            if cli.json {
                println!("{}", to_json(&response));
            } else {
                if response.records().is_empty() {
                    eprintln!("Nenhum resultado encontrado para '{query}'");
                    std::process::exit(1);
                }
                print_table(response.records());
                eprintln!(
                    "\n{} resultados em {}ms ({})",
                    response.count,
                    format_elapsed(elapsed),
                    algorithm_name(&method)
                );
            }
        }
        Commands::Catalog { page, per_page } => {
            let backend = build_backend(&config);
            let per_page = per_page.unwrap_or(config.catalog_per_page);
            let catalog = match backend.catalog(page, per_page).await {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Erro ao carregar catálogo: {e}");
                    std::process::exit(1);
                }
            };

            if cli.json {
                println!("{}", to_json(&catalog));
            } else {
                print_table(&catalog.results);
                eprintln!(
                    "\nPágina {} de {} ({} carros)",
                    catalog.page, catalog.total_pages, catalog.total
                );
            }
        }
        Commands::Methods => {
            if cli.json {
                let items: Vec<serde_json::Value> = SearchMethod::ALL
                    .iter()
                    .map(|m| serde_json::json!({ "method": m.as_str(), "label": m.label() }))
                    .collect();
                println!("{}", to_json(&items));
            } else {
                for m in SearchMethod::ALL {
                    println!("{:<12} {}", m.as_str(), m.label());
                }
            }
        }
        Commands::Serve { port, bind_all } => {
            let bind_addr = if bind_all { "0.0.0.0" } else { "127.0.0.1" };
            let ctx = AppContext { backend: build_backend(&config), stale_policy: config.stale_policy };
            let app = carsearch_http::router(Arc::new(ctx));

            let listener = tokio::net::TcpListener::bind(format!("{bind_addr}:{port}"))
                .await
                .unwrap_or_else(|e| {
                    error!(port = port, error = %e, "Could not bind to port");
                    std::process::exit(1);
                });

            info!(backend = %config.base_url, "Proxying searches");
            info!(port = port, "http://{bind_addr}:{port}");

            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
                error!(error = %e, "Server error");
                std::process::exit(1);
            }
        }
    }
}
