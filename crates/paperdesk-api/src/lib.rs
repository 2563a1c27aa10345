//! # paperdesk-api
//!
//! HTTP server for paperdesk: the question page, JSON and SSE answer
//! endpoints, and provisioning control.
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/` | GET | Question page with provisioning banners |
//! | `/health` | GET | Liveness, provider reachability, readiness |
//! | `/api/v1/status` | GET | Provisioning state and banners |
//! | `/api/v1/provision` | POST | Rerun provisioning |
//! | `/api/v1/reset` | POST | Clear cached ids |
//! | `/api/v1/ask` | POST | Answer a question (JSON) |
//! | `/api/v1/ask/stream` | GET | Answer a question (SSE) |

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub use error::ApiError;
pub use state::{AppState, Banner, StatusSnapshot};

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::ui::index))
        .route("/health", get(handlers::status::health_check))
        .route("/api/v1/status", get(handlers::status::status))
        .route("/api/v1/provision", post(handlers::status::provision))
        .route("/api/v1/reset", post(handlers::status::reset))
        .route("/api/v1/ask", post(handlers::ask::ask))
        .route("/api/v1/ask/stream", get(handlers::ask::ask_stream))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}
