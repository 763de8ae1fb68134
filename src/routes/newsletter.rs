use anyhow::anyhow;
use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::ValidateEmail;

use crate::config::require;
use crate::dispatch::{dispatch, DispatchPolicy};
use crate::errors::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
}

/// Forward a signup to the mailing-list provider. The provider is the
/// system of record; nothing is stored here.
pub async fn newsletter_signup(
    State(state): State<AppState>,
    Json(signup): Json<NewsletterSignup>,
) -> Result<Json<Value>> {
    if !signup.email.validate_email() {
        return Err(ApiError::Validation(vec![
            "email: must be a valid email address".to_string(),
        ]));
    }

    let api_key =
        require(&state.config.newsletter_api_key, "NEWSLETTER_API_KEY")?.to_string();
    let base = require(&state.config.newsletter_api_base, "NEWSLETTER_API_BASE")?.to_string();

    dispatch(DispatchPolicy::Required, "newsletter", async {
        let response = state
            .http
            .post(format!("{base}/subscribers"))
            .bearer_auth(&api_key)
            .json(&json!({ "email": signup.email }))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("mailing-list provider returned {status}: {body}"));
        }
        Ok(())
    })
    .await?;

    Ok(Json(json!({ "success": true })))
}
