//! STIR Settlements server
//!
//! Runs the settlement price scraper loop and/or the REST API server.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stir_settlements::api::create_router;
use stir_settlements::config::Config;
use stir_settlements::error::ErrorResponse;
use stir_settlements::models::{HealthResponse, NormalizedContract};
use stir_settlements::scheduler::Scheduler;
use stir_settlements::scraper::BrowserScraper;
use stir_settlements::state::{AppState, ScrapeStatus};
use stir_settlements::store::SnapshotStore;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        stir_settlements::api::handlers::root,
        stir_settlements::api::handlers::health_check,
        stir_settlements::api::handlers::get_zq,
        stir_settlements::api::handlers::get_sr3,
    ),
    components(schemas(HealthResponse, NormalizedContract, ErrorResponse)),
    tags(
        (name = "Health", description = "Liveness and health endpoints"),
        (name = "Settlements", description = "Futures settlement prices"),
    ),
    info(
        title = "STIR Settlements API",
        version = "0.1.0",
        description = "ZQ and SR3 futures settlement prices",
        license(name = "MIT")
    )
)]
struct ApiDoc;

#[derive(Debug, Parser)]
#[command(name = "stir-settlements", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Run the scrape scheduler and the API server together (default).
    Run,
    /// Serve the API from existing snapshot files.
    Serve,
    /// Run the scrape scheduler only.
    Scrape,
    /// Run a single scrape cycle and exit.
    Once,
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config = if path.exists() {
        info!("Loading configuration from {}", path.display());
        Config::load(path)?
    } else {
        info!("{} not found, using default configuration", path.display());
        Config::default()
    };
    config.apply_env()?;
    Ok(config)
}

fn build_scheduler(config: &Config, store: SnapshotStore, status: Arc<ScrapeStatus>) -> Scheduler {
    let scraper = Arc::new(BrowserScraper::new(config.scraper.clone()));
    Scheduler::new(
        scraper,
        store,
        config.sources.clone(),
        config.schedule.interval(),
        status,
    )
}

/// Flips the shutdown flag on Ctrl+C.
fn spawn_shutdown_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Stopped by user (Ctrl+C)");
                let _ = tx.send(true);
            }
            Err(e) => {
                error!("Unable to listen for Ctrl+C: {}", e);
                // Keep the sender alive so receivers do not treat this as shutdown.
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}

async fn serve(
    config: &Config,
    state: Arc<AppState>,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let host = &config.server.host;
    let port = config.server.port;

    info!("Starting STIR Settlements API on {}:{}", host, port);
    info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let store = SnapshotStore::new(config.storage.data_dir.clone());
    let status = Arc::new(ScrapeStatus::new());
    info!("Snapshots stored in {}", store.dir().display());

    match cli.command.unwrap_or(Command::Run) {
        Command::Once => {
            let scheduler = build_scheduler(&config, store, status);
            let report = scheduler.run_cycle().await;
            if report.failed() > 0 {
                anyhow::bail!("{} of {} products failed", report.failed(), report.outcomes.len());
            }
        }
        Command::Scrape => {
            let scheduler = build_scheduler(&config, store, status);
            scheduler.run(spawn_shutdown_listener()).await;
        }
        Command::Serve => {
            let state = Arc::new(AppState::new(store, status));
            serve(&config, state, spawn_shutdown_listener()).await?;
        }
        Command::Run => {
            let shutdown = spawn_shutdown_listener();
            let scheduler = build_scheduler(&config, store.clone(), Arc::clone(&status));
            let scheduler_shutdown = shutdown.clone();
            let scheduler_task =
                tokio::spawn(async move { scheduler.run(scheduler_shutdown).await });

            let state = Arc::new(AppState::new(store, status));
            serve(&config, state, shutdown).await?;
            scheduler_task.await?;
        }
    }

    Ok(())
}
