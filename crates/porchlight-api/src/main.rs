//! Porchlight - presence-triggered lighting API server

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use hue_bridge::HueClient;
use presence_core::OccupancyStore;
use presence_rules::{LightCommand, LightSets, PresenceRuleEngine};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<OccupancyStore>,
    pub engine: Arc<PresenceRuleEngine>,
    pub hue: Arc<HueClient>,
}

/// API response wrapper using serde_json::Value for flexibility
#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: Some(serde_json::to_value(data).unwrap_or(serde_json::Value::Null)),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Service banner
async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Porchlight",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Retrieve current status of all users
async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.store.list_users()))
}

/// Update a user's presence state
///
/// Succeeds once the store mutation and rule evaluation have run; delivery
/// of the resulting light commands is fire-and-forget and never fails the
/// request.
async fn update_user_state(
    State(state): State<AppState>,
    Path((user_id, presence)): Path<(String, String)>,
) -> impl IntoResponse {
    let transition = match state.store.set_state(&user_id, &presence) {
        Ok(transition) => transition,
        Err(e) => {
            tracing::error!("Rejected state change for user {}: {}", user_id, e);
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
        }
    };

    tracing::info!(
        "Changing state of user {} ({}) from {} to {}",
        transition.user.id,
        transition.user.name,
        transition.previous,
        transition.current
    );

    let commands = state.engine.evaluate(&transition);
    if !commands.is_empty() {
        dispatch_commands(Arc::clone(&state.hue), commands);
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "user": transition.user.id,
            "previous": transition.previous,
            "state": transition.current,
        }))),
    )
}

/// Deliver commands to the bridge without blocking the request
///
/// Each command is attempted independently; a failure for one light is
/// logged and must not stop the rest of the batch.
fn dispatch_commands(hue: Arc<HueClient>, commands: Vec<LightCommand>) {
    tokio::spawn(async move {
        for command in commands {
            tracing::debug!(
                "Changing state of light {} to {}",
                command.light_id,
                command.on
            );
            if let Err(e) = hue.set_light_state(command.light_id, command.on).await {
                tracing::error!("Failed to command light {}: {}", command.light_id, e);
            }
        }
    });
}

/// Build the tracing filter from the logging configuration
fn log_filter(logging: &config::LoggingConfig) -> String {
    if !logging.enabled {
        return "off".to_string();
    }
    let level = logging.level.as_deref().unwrap_or("debug");
    format!("porchlight_api={level},presence_core={level},presence_rules={level},hue_bridge={level},info")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing init so the configured level applies
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "./config.json".to_string());
    let config = config::load(std::path::Path::new(&config_path)).await?;

    // Initialize tracing; RUST_LOG wins over the config file
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(&config.logging).into()),
        )
        .init();

    tracing::info!("Starting Porchlight API server");

    let store = Arc::new(OccupancyStore::new(config.users.clone()));
    tracing::info!(
        "Loaded roster with {} users, {} currently home",
        store.list_users().len(),
        store.count_home()
    );

    let lights = LightSets::new(config.lights.last_out.clone(), config.lights.first_in.clone());
    let engine = Arc::new(PresenceRuleEngine::new(Arc::clone(&store), lights));

    tracing::info!("Using Hue bridge at {}", config.bridge.host);
    let hue = Arc::new(HueClient::new(&config.bridge.host, &config.bridge.username)?);

    let state = AppState { store, engine, hue };

    // Build the router
    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/users", get(list_users))
        .route("/user/:user_id/:state", put(update_user_state))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.application.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
