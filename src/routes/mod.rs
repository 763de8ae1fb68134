use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod forms;
pub mod grants;
pub mod newsletter;
pub mod webhooks;

/// Full API surface. Webhook routes take the body as raw `Bytes` so no
/// JSON parsing happens before signature verification.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/apply-grant", post(grants::apply_grant))
        .route("/api/submit-report", post(grants::submit_report))
        .route("/api/btcpay-webhook", post(webhooks::btcpay_webhook))
        .route("/api/btcpay-webhook-ops", post(webhooks::btcpay_webhook_ops))
        .route("/api/stripe-webhook", post(webhooks::stripe_webhook))
        .route("/api/grant", post(grants::lookup_grant))
        .route("/api/validate-grant", post(grants::validate_grant))
        .route("/api/newsletter", post(newsletter::newsletter_signup))
        .route("/api/form-token", get(forms::form_token))
        .route("/api/draft/{form}", get(forms::read_draft))
        .with_state(state)
}
