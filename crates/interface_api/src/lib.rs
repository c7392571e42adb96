//! HTTP API Layer
//!
//! Axum routes for the submission-to-bind portal. Agencies create
//! submissions, review and approve quotes, sign, pay and request bind;
//! system admins route submissions, enter and post quotes and approve binds.
//!
//! - **Handlers**: one module per workflow area
//! - **Middleware**: bearer auth and audit logging
//! - **DTOs**: camelCase request and response bodies
//! - **Error Handling**: `{success: false, error}` with status by error kind
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(port, payments, renderer, config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_documents::{DocumentAssembler, PdfRenderer};
use domain_submission::{BindWorkflowService, PaymentProcessor, WorkflowPort};

use crate::config::ApiConfig;
use crate::handlers::{bind, documents, health, quotes, submissions};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub workflow: BindWorkflowService,
    pub documents: DocumentAssembler,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(
        port: Arc<dyn WorkflowPort>,
        payments: Arc<dyn PaymentProcessor>,
        renderer: Arc<dyn PdfRenderer>,
        config: ApiConfig,
    ) -> Self {
        Self {
            workflow: BindWorkflowService::new(port, payments).with_settings(config.workflow_settings()),
            documents: DocumentAssembler::new(renderer),
            config: Arc::new(config),
        }
    }

    /// Direct store access for reads the service does not wrap
    pub fn port(&self) -> &Arc<dyn WorkflowPort> {
        self.workflow.port()
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let agency_routes = Router::new()
        .route("/submissions", post(submissions::create_submission))
        .route("/submissions/:id", get(submissions::get_submission))
        .route("/quotes/:id", get(quotes::get_quote).patch(quotes::update_quote))
        .route("/quotes/:id/approve", post(quotes::approve_quote))
        .route("/quotes/:id/generate-documents", post(documents::generate_documents))
        .route("/quotes/:id/documents/:document", get(documents::get_document))
        .route("/bound-policies", get(submissions::bound_policies));

    let admin_routes = Router::new()
        .route("/quotes", post(quotes::enter_quote).get(quotes::list_quotes))
        .route("/quotes/:id/post", post(quotes::post_quote))
        .route("/submissions/:id/route", post(submissions::route_submission))
        .route("/submissions/:id/decline", post(submissions::decline_submission))
        .route("/bind-requests", get(submissions::bind_requests));

    let api_routes = Router::new()
        .nest("/agency", agency_routes)
        .nest("/admin", admin_routes)
        .route("/esign/send", post(bind::send_for_signature))
        .route("/esign/sign", post(bind::sign))
        .route("/payment/pay", post(bind::pay))
        .route("/bind/request", post(bind::request_bind))
        .route("/bind/approve", post(bind::approve_bind))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
