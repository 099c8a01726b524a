use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, put},
};
use clap::Parser;
use common::{
    doc_store::{self, DocStore},
    load_settings,
    logging::Logging,
};
use models::settings::{AccessConfig, Settings};
use serde_json::to_string;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod analytics;
mod models;
mod service;

use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    settings: Option<String>,

    #[arg(long)]
    frontend: Option<String>,
}

fn graceful_shutdown(shutdown_signal: &CancellationToken) {
    info!("Graceful shutdown initiated");
    shutdown_signal.cancel();
}

struct AppState {
    store: DocStore,
    access: AccessConfig,
}

#[tokio::main]
async fn main() {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

    let cmdline_args = Args::parse();
    let settings_path = cmdline_args
        .settings
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings: Settings = load_settings(&settings_path);

    let frontend_path = match cmdline_args.frontend {
        Some(path) => path,
        None => "frontend".to_string(),
    };

    let cancel_token = CancellationToken::new();
    Logging::new(&settings.logging).expect("Failed to start logging");

    let version = env!("CARGO_PKG_VERSION");

    info!("___/********Finance Dashboard v{}********\\___", version);

    info!(
        "Settings: {}",
        &to_string(&settings).expect("Failed to parse settings to json")
    );

    let store = doc_store::startup_store(&settings.database).await;

    let state = Arc::new(AppState {
        store,
        access: settings.access,
    });

    let base_url = "http://localhost:8000";

    let cors = CorsLayer::new()
        .allow_origin(base_url.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/summary", get(service::summary::overview))
        .route("/summary/runway", get(service::summary::runway))
        .route("/summary/accounts", get(service::summary::account_rollups))
        .route("/summary/projects", get(service::summary::project_rollups))
        .route(
            "/accounts",
            get(service::accounts::list).post(service::accounts::create),
        )
        .route(
            "/accounts/{id}",
            put(service::accounts::update).delete(service::accounts::remove),
        )
        .route(
            "/clients",
            get(service::clients::list).post(service::clients::create),
        )
        .route(
            "/clients/{id}",
            put(service::clients::update).delete(service::clients::remove),
        )
        .route(
            "/projects",
            get(service::projects::list).post(service::projects::create),
        )
        .route(
            "/projects/{id}",
            put(service::projects::update).delete(service::projects::remove),
        )
        .route(
            "/expenses",
            get(service::expenses::list).post(service::expenses::create),
        )
        .route(
            "/expenses/{id}",
            put(service::expenses::update).delete(service::expenses::remove),
        )
        .route(
            "/earnings",
            get(service::earnings::list).post(service::earnings::create),
        )
        .route(
            "/earnings/{id}",
            put(service::earnings::update).delete(service::earnings::remove),
        )
        .with_state(state)
        .layer(cors)
        .fallback_service(ServeDir::new(frontend_path).append_index_html_on_directories(true));

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    info!("listening on {}", listener.local_addr().unwrap());

    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                graceful_shutdown(&shutdown_token);
            }
            _ = signal::ctrl_c() => {
                graceful_shutdown(&shutdown_token);
            }
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel_token.cancelled_owned())
        .await
        .unwrap();
}
