use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Serialize;
use shared::CallbackNotification;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::handlers::PaymentReconciler;
use crate::pages;
use crate::signature::SignatureVerifier;

/// Permissive cross-origin policy sent with every callback response.
const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, PUT, DELETE, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
];

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<PaymentReconciler>,
    /// Present only when a merchant salt is configured.
    pub verifier: Option<Arc<SignatureVerifier>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/payment_callback",
            post(payment_callback).options(callback_preflight),
        )
        .route("/payment/success", get(pages::payment_success))
        .route("/payment/failure", get(pages::payment_failure))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub async fn callback_preflight() -> impl IntoResponse {
    (CORS_HEADERS, Json(serde_json::json!({})))
}

pub async fn payment_callback(
    State(state): State<AppState>,
    form: Result<Form<CallbackNotification>, FormRejection>,
) -> Response {
    let Form(notification) = match form {
        Ok(form) => form,
        Err(e) => {
            error!("Callback Error: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Callback failed");
        }
    };

    match &state.verifier {
        Some(verifier) => {
            if !verifier.verify(&notification) {
                warn!(
                    "Rejected callback for {:?}: signature mismatch",
                    notification.txnid
                );
                return error_response(StatusCode::UNAUTHORIZED, "Invalid callback signature");
            }
        }
        None => warn!(
            "Callback for {:?} accepted without signature verification",
            notification.txnid
        ),
    }

    let redirect = state
        .reconciler
        .reconcile(&notification)
        .await
        .and_then(|reconciliation| see_other(&reconciliation.location));

    match redirect {
        Ok(response) => response,
        Err(e) => {
            error!("Callback Error: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Callback failed")
        }
    }
}

fn see_other(location: &str) -> anyhow::Result<Response> {
    let location = HeaderValue::from_str(location)?;
    Ok((
        StatusCode::SEE_OTHER,
        CORS_HEADERS,
        [(header::LOCATION, location)],
    )
        .into_response())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        CORS_HEADERS,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn health_check() -> &'static str {
    "OK"
}
