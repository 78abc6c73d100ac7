mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Json, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use waymark_core::Intent;
use waymark_observability::{AppMetrics, MetricsSnapshot};
use waymark_pipeline::{PipelineConfig, TripPipeline};
use waymark_resolve::Resolver;
use waymark_tagger::TaggerStack;

use crate::rate_limit::IpRateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<TripPipeline<Resolver>>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub limiter: IpRateLimiter,
    pub resolver_backend: &'static str,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    resolver: &'static str,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Deserialize)]
struct PlanRequest {
    query: String,
}

#[derive(Debug, Serialize)]
struct IntentDescriptor {
    id: Intent,
    label: &'static str,
}

pub async fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();
    let resolver = Resolver::from_env().context("failed to initialize place resolver")?;
    let resolver_backend = resolver.backend_name();

    let pipeline = Arc::new(TripPipeline::new(
        Arc::new(resolver),
        TaggerStack::load_default(),
        PipelineConfig::from_env(),
        metrics.clone(),
    ));

    let api_key = env::var("WAYMARK_API_KEY").unwrap_or_else(|_| "dev-waymark-key".to_string());
    let rate_limit_window = Duration::from_secs(
        env::var("WAYMARK_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("WAYMARK_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(80);
    let allowed_origins = parse_allowed_origins();

    let state = ApiState {
        pipeline,
        metrics,
        api_key,
        limiter: IpRateLimiter::new(rate_limit_window, rate_limit_max),
        resolver_backend,
        allowed_origins: Arc::new(allowed_origins),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/trip/plan", post(plan_trip))
        .route("/v1/query/analyze", post(analyze_query))
        .route("/v1/intents", get(list_intents))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(32 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        resolver: state.resolver_backend,
        metrics: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(payload))
}

async fn plan_trip(
    State(state): State<ApiState>,
    Json(request): Json<PlanRequest>,
) -> impl IntoResponse {
    if request.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "empty_query",
                "message": "query must not be empty"
            })),
        )
            .into_response();
    }

    let result = state.pipeline.run(&request.query).await;
    (StatusCode::OK, Json(result)).into_response()
}

async fn analyze_query(
    State(state): State<ApiState>,
    Json(request): Json<PlanRequest>,
) -> impl IntoResponse {
    if request.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "empty_query",
                "message": "query must not be empty"
            })),
        )
            .into_response();
    }

    let analysis = state.pipeline.analyze(&request.query);
    (StatusCode::OK, Json(analysis)).into_response()
}

async fn list_intents() -> impl IntoResponse {
    let intents = Intent::ALL
        .iter()
        .map(|intent| IntentDescriptor {
            id: *intent,
            label: intent.label(),
        })
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(intents))
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if request.method() == Method::OPTIONS || is_public_endpoint(path.as_str()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key == state.api_key {
        return next.run(request).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "unauthorized",
            "message": "missing or invalid x-api-key"
        })),
    )
        .into_response()
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    if is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "rate_limited",
                "message": "rate limit exceeded for this IP"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

fn is_public_endpoint(path: &str) -> bool {
    matches!(path, "/health")
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "local".to_string())
}

fn parse_allowed_origins() -> Vec<String> {
    env::var("WAYMARK_ALLOWED_ORIGINS")
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static("http://localhost:5500")]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
        ])
}
