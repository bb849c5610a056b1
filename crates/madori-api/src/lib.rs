//! # madori-api
//!
//! HTTP surface of the madori floor-plan catalog.
//!
//! The router is built by [`app`] from an [`AppState`]; the binary in
//! `main.rs` only wires configuration, logging and storage into it.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use madori_core::PlanRepository;
use madori_db::StorageBackend;
use madori_search::{PlanSearch, PlanSearchEngine};

pub use auth::Principal;
pub use config::ApiConfig;
pub use error::ApiError;

/// Multipart framing allowance on top of the largest accepted PDF.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub plans: Arc<dyn PlanRepository>,
    pub storage: Arc<dyn StorageBackend>,
    pub search: Arc<dyn PlanSearch>,
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        storage: Arc<dyn StorageBackend>,
        max_upload_bytes: u64,
    ) -> Self {
        let search = Arc::new(PlanSearchEngine::new(plans.clone()));
        Self {
            plans,
            storage,
            search,
            max_upload_bytes,
        }
    }
}

/// UUIDv7 request ids, so ids sort by arrival time in the logs.
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse a comma-separated origin list. Unparseable entries are skipped.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(origin = trimmed, error = %e, "Skipping invalid CORS origin");
                    None
                }
            }
        })
        .collect()
}

/// Build the application router.
pub fn app(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let x_user_id = HeaderName::from_static(auth::USER_ID_HEADER);
    let x_company_id = HeaderName::from_static(auth::COMPANY_ID_HEADER);

    let plan_routes = Router::new()
        .route(
            "/",
            get(handlers::plans::list_plans).post(handlers::plans::upload_plan),
        )
        .route("/search", post(handlers::plans::search))
        .route(
            "/parse-filenames",
            post(handlers::plans::parse_filenames),
        )
        .route(
            "/generate-filename",
            post(handlers::plans::generate_plan_filename),
        )
        .route(
            "/:id",
            get(handlers::plans::get_plan)
                .patch(handlers::plans::update_plan)
                .delete(handlers::plans::delete_plan),
        )
        .route("/:id/favorite", post(handlers::plans::toggle_favorite))
        .route("/:id/pdf", get(handlers::plans::download_pdf));

    Router::new()
        .route("/health", get(handlers::system::health_check))
        .route("/api-docs/openapi.json", get(handlers::system::openapi_json))
        .nest("/api/v1/plans", plan_routes)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                    company_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    x_user_id,
                    x_company_id,
                ])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
