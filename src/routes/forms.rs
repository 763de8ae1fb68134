use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::config::require;
use crate::draft_cookie::{self, APPLY_DRAFT_COOKIE, REPORT_DRAFT_COOKIE};
use crate::errors::{ApiError, Result};
use crate::formtoken::{self, FormToken};
use crate::state::AppState;

/// Issue a signed timestamp for embedding in a form's hidden fields at
/// render time.
pub async fn form_token(State(state): State<AppState>) -> Result<Json<FormToken>> {
    let secret = require(&state.config.form_token_secret, "FORM_TOKEN_SECRET")?;
    Ok(Json(formtoken::issue(secret, Utc::now().timestamp_millis())))
}

/// Return a previously saved draft for a form, or `null` fields when there
/// is none. A draft that fails to decrypt is indistinguishable from a
/// missing one — the form renders empty either way.
pub async fn read_draft(
    State(state): State<AppState>,
    Path(form): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let secret = require(&state.config.cookie_secret, "COOKIE_SECRET")?;
    let fields = match form.as_str() {
        "apply" => draft_cookie::cookie_value(&headers, APPLY_DRAFT_COOKIE)
            .and_then(|v| draft_cookie::decrypt_fields(secret, v)),
        "report" => draft_cookie::cookie_value(&headers, REPORT_DRAFT_COOKIE).and_then(|v| {
            draft_cookie::decrypt_report_draft(secret, v, Utc::now().timestamp_millis())
        }),
        _ => return Err(ApiError::NotFound("form")),
    };
    Ok(Json(json!({ "fields": fields })))
}
