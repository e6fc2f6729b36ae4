//! HTTP API server implementation

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::core::config::ServiceConfig;
use crate::core::errors::TranslationError;
use crate::core::handler::TranslationHandler;
use crate::core::models::{TranslationRequest, TranslationResponse};

const SERVICE_NAME: &str = "brix-translator";

/// Application state
#[derive(Clone)]
pub struct AppState {
    handler: Arc<TranslationHandler>,
}

/// Liveness response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
    credential_configured: bool,
    models: Vec<String>,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(root, health_check, translate),
    components(schemas(
        TranslationRequest,
        TranslationResponse,
        ErrorResponse,
        RootResponse,
        HealthResponse
    )),
    info(
        title = "Brix Keyboard AI Translation Service",
        description = "Singlish-to-English translation backed by Gemini"
    )
)]
struct ApiDoc;

fn status_for(err: &TranslationError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for TranslationError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    warn!("Handler panicked: {}", detail);
    TranslationError::InternalError(detail).into_response()
}

/// Bodies the JSON extractor refused keep the `{"detail": ...}` shape
fn rejection_response(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    let body = ErrorResponse {
        detail: rejection.body_text(),
    };
    (status, Json(body)).into_response()
}

/// Liveness handler
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = RootResponse))
)]
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Brix Keyboard AI Translation Service is running.".to_string(),
    })
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service status", body = HealthResponse))
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        credential_configured: state.handler.credential_configured(),
        models: state.handler.candidate_names(),
    })
}

/// Translate Singlish text to English
#[utoipa::path(
    post,
    path = "/translate",
    request_body = TranslationRequest,
    responses(
        (status = 200, description = "Translated text", body = TranslationResponse),
        (status = 400, description = "Text is empty or the body is not valid JSON", body = ErrorResponse),
        (status = 422, description = "Body is missing the text field", body = ErrorResponse),
        (status = 500, description = "Missing credential or every model failed", body = ErrorResponse)
    )
)]
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            return rejection_response(rejection);
        }
    };

    match state.handler.translate(&payload.text).await {
        Ok(outcome) => {
            info!("Translated via {}", outcome.source);
            Json(TranslationResponse::from(outcome)).into_response()
        }
        Err(e) => {
            warn!("Translation failed: {}", e);
            e.into_response()
        }
    }
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the router around a ready handler
pub fn router(handler: Arc<TranslationHandler>) -> Router {
    let state = Arc::new(AppState { handler });

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/translate", post(translate))
        .route("/openapi.json", get(openapi))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let handler = Arc::new(TranslationHandler::from_config(&config)?);
    info!(
        "Model candidates: {}",
        handler.candidate_names().join(", ")
    );

    let app = router(handler);

    // Bind address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
