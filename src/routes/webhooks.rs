use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::config::require;
use crate::donation::{self, BtcPayEvent, Donation, StripeEvent};
use crate::errors::{ApiError, Result};
use crate::state::AppState;
use crate::verification;

pub const BTCPAY_SIGNATURE_HEADER: &str = "btcpay-sig";
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

fn signature_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingSignature)
}

/// Settlement webhook for the general donation store.
pub async fn btcpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let secret =
        require(&state.config.btcpay_webhook_secret, "BTCPAY_WEBHOOK_SECRET")?.to_string();
    handle_btcpay(&state, &headers, &body, &secret, "General Fund").await
}

/// Same scheme for the operations store, with its own shared secret.
pub async fn btcpay_webhook_ops(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let secret = require(
        &state.config.btcpay_ops_webhook_secret,
        "BTCPAY_OPS_WEBHOOK_SECRET",
    )?
    .to_string();
    handle_btcpay(&state, &headers, &body, &secret, "Operations Fund").await
}

/// Verify-then-parse for a BTCPay delivery. The body arrives as raw bytes
/// (no JSON extractor upstream) because the signature is defined over the
/// exact byte sequence received.
async fn handle_btcpay(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
    secret: &str,
    default_fund: &str,
) -> Result<Json<Value>> {
    let signature = signature_header(headers, BTCPAY_SIGNATURE_HEADER)?;
    if !verification::verify_hmac_signature(secret, body, signature) {
        return Err(ApiError::InvalidSignature);
    }

    let event: BtcPayEvent =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    info!(
        delivery = event.delivery_id.as_deref().unwrap_or("-"),
        store = event.store_id.as_deref().unwrap_or("-"),
        event_type = %event.event_type,
        "verified webhook delivery"
    );

    match Donation::from_btcpay(&event, default_fund) {
        Some(donation) => donation::process_settled_donation(state, &donation).await,
        None => info!(event_type = %event.event_type, "ignoring non-settlement event"),
    }

    Ok(Json(json!({ "success": true, "eventType": event.event_type })))
}

/// Card-payment webhook. Signature scheme follows the provider's own
/// construction: the `stripe-signature` header carries a timestamp and
/// HMAC candidates over "<timestamp>.<raw body>".
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let secret =
        require(&state.config.stripe_webhook_secret, "STRIPE_WEBHOOK_SECRET")?.to_string();
    let signature = signature_header(&headers, STRIPE_SIGNATURE_HEADER)?;

    if !verification::verify_stripe_signature(&secret, &body, signature, Utc::now().timestamp()) {
        return Err(ApiError::InvalidSignature);
    }

    let event: StripeEvent =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match Donation::from_stripe(&event) {
        Some(donation) => donation::process_settled_donation(&state, &donation).await,
        None => info!(event_type = %event.event_type, "ignoring non-settlement event"),
    }

    Ok(Json(json!({ "success": true, "eventType": event.event_type })))
}
