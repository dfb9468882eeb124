use axum::{
    extract::{Json, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use modfinder_engine::{
    EngineConfig, ModFinder, ModFinderError, ModLoader, ModQuery, ModResponse, RateLimiter, Website,
};

#[derive(Clone)]
struct AppState {
    finder: Arc<ModFinder>,
}

#[derive(Debug, Deserialize)]
struct ModParams {
    name: String,
    version: String,
    loader: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    websites: Vec<Website>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modfinder_server=debug,modfinder_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env()?;

    tracing::info!("🚀 Starting ModFinder server");
    tracing::info!("⏱️ Rate limit: 1 request every {}ms", config.rate_limit.as_millis());

    let finder = ModFinder::from_config(&config)?;
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));

    let state = AppState {
        finder: Arc::new(finder),
    };

    // Only catalog lookups are throttled
    let mod_routes = Router::new()
        .route("/api/mod/:website", get(mod_handler))
        .route_layer(middleware::from_fn_with_state(limiter, throttle));

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/versions/:website", get(versions_handler))
        .merge(mod_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = config.socket_addr();
    tracing::info!("🧱 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down server...");
}

async fn throttle(State(limiter): State<Arc<RateLimiter>>, request: Request, next: Next) -> Response {
    let waited = limiter.acquire().await;
    if !waited.is_zero() {
        tracing::debug!("Request to {} held back {}ms", request.uri().path(), waited.as_millis());
    }
    next.run(request).await
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: modfinder_engine::VERSION.to_string(),
        websites: state.finder.websites(),
    })
}

async fn mod_handler(
    State(state): State<AppState>,
    Path(website): Path<String>,
    Query(params): Query<ModParams>,
) -> Result<Json<ModResponse>, AppError> {
    tracing::debug!("Mod request on {}: {:?}", website, params);

    let website: Website = website.parse()?;
    let loader: ModLoader = params.loader.parse()?;
    let query = ModQuery::new(params.name, params.version, loader);

    let result = state.finder.find(website, &query).await?;
    Ok(Json(result))
}

async fn versions_handler(
    State(state): State<AppState>,
    Path(website): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let website: Website = website.parse()?;
    let versions = state.finder.game_versions(website).await?;
    Ok(Json(versions))
}

// Error handling
struct AppError(ModFinderError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ModFinderError::NotFound(_) => StatusCode::NOT_FOUND,
            ModFinderError::UnknownWebsite(_) | ModFinderError::UnknownLoader(_) => {
                StatusCode::BAD_REQUEST
            }
            ModFinderError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ModFinderError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            e if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ModFinderError::Provider { .. } | ModFinderError::HttpRequest(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!("❌ Error: {} - {}", status, message);
        } else {
            tracing::warn!("⚠️ {} - {}", status, message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<ModFinderError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
