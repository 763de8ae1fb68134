use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::config::require;
use crate::dispatch::{dispatch, DispatchPolicy};
use crate::draft_cookie::{
    self, APPLY_DRAFT_COOKIE, REPORT_DRAFT_COOKIE, REPORT_DRAFT_TTL_DAYS,
};
use crate::errors::{ApiError, Result};
use crate::spam::{self, FormGuard};
use crate::state::AppState;
use crate::tracker::is_valid_grant_number;

pub const APPLY_FORM_PATH: &str = "/apply";
pub const REPORT_FORM_PATH: &str = "/reports";

/// Grant application as submitted from the public form. The honeypot and
/// token fields ride along as ordinary fields; `#[serde(default)]` keeps
/// absent fields as empty strings so validation reports them by name.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct GrantApplication {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "project name is required"))]
    pub project_name: String,
    #[validate(length(min = 1, message = "project description is required"))]
    pub project_description: String,
    #[validate(length(min = 1, message = "potential impact is required"))]
    pub potential_impact: String,
    pub budget: String,
    pub duration: String,
    pub license: String,
    pub github: String,
    pub other_contact: String,

    // Honeypot: hidden from sighted users, present in markup.
    pub organization_website: String,
    pub form_timestamp: String,
    pub form_signature: String,
}

/// Progress report for an existing grant.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProgressReport {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    pub email: String,
    pub grant_number: String,
    #[validate(length(min = 1, message = "report is required"))]
    pub report: String,

    pub organization_website: String,
    pub form_timestamp: String,
    pub form_signature: String,
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn parse_submission<T: DeserializeOwned>(headers: &HeaderMap, body: &Bytes) -> Result<T> {
    if is_form_encoded(headers) {
        serde_urlencoded::from_bytes(body).map_err(|e| ApiError::BadRequest(e.to_string()))
    } else {
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Flatten validator output to per-field messages, sorted for stable
/// response bodies.
fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: invalid value"),
            })
        })
        .collect();
    messages.sort();
    messages
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// The success body is identical for genuine and silently-dropped spam
/// submissions so automated senders get no rejection signal.
fn success_response(wants_html: bool, form_path: &str) -> Response {
    if wants_html {
        Redirect::to(&format!("{form_path}?submitted=true")).into_response()
    } else {
        Json(json!({ "message": "success" })).into_response()
    }
}

/// Validation failure for a no-JS form client: preserve the typed input in
/// an encrypted draft cookie and bounce back to the form with a banner
/// message in the query string.
fn validation_redirect(
    state: &AppState,
    form_path: &str,
    cookie_name: &str,
    fields: &Value,
    messages: &[String],
    max_age_secs: Option<i64>,
) -> Response {
    let message = messages.first().cloned().unwrap_or_else(|| "validation failed".to_string());
    let query = serde_urlencoded::to_string([("error", message.as_str())])
        .unwrap_or_else(|_| "error=validation".to_string());
    let location = format!("{form_path}?{query}");

    let Some(secret) = state.config.cookie_secret.as_deref() else {
        warn!("COOKIE_SECRET not set; draft not preserved across redirect");
        return Redirect::to(&location).into_response();
    };

    let encrypted = if cookie_name == REPORT_DRAFT_COOKIE {
        draft_cookie::encrypt_report_draft(secret, fields, Utc::now().timestamp_millis())
    } else {
        draft_cookie::encrypt_fields(secret, fields)
    };
    let cookie = draft_cookie::set_cookie_header(
        cookie_name,
        &encrypted,
        form_path,
        state.config.production,
        max_age_secs,
    );
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(&location)).into_response()
}

fn application_fields(app: &GrantApplication) -> Value {
    json!({
        "name": app.name,
        "email": app.email,
        "project_name": app.project_name,
        "project_description": app.project_description,
        "potential_impact": app.potential_impact,
        "budget": app.budget,
        "duration": app.duration,
        "license": app.license,
        "github": app.github,
        "other_contact": app.other_contact,
    })
}

fn application_issue_body(app: &GrantApplication) -> String {
    format!(
        "## Grant application\n\n\
         **Project:** {project}\n\n\
         **Applicant:** {name} ({email})\n\n\
         **Description**\n\n{description}\n\n\
         **Potential impact**\n\n{impact}\n\n\
         **Budget:** {budget}\n\
         **Duration:** {duration}\n\
         **License:** {license}\n\
         **Repository:** {github}\n\
         **Other contact:** {other}\n",
        project = app.project_name,
        name = app.name,
        email = app.email,
        description = app.project_description,
        impact = app.potential_impact,
        budget = app.budget,
        duration = app.duration,
        license = app.license,
        github = app.github,
        other = app.other_contact,
    )
}

/// Accept a grant application: spam check, field validation, then forward
/// to the issue tracker (best-effort) and the internal email channel
/// (required).
pub async fn apply_grant(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let form_secret =
        require(&state.config.form_token_secret, "FORM_TOKEN_SECRET")?.to_string();
    let wants_html = is_form_encoded(&headers);
    let app: GrantApplication = parse_submission(&headers, &body)?;
    let submission_id = uuid::Uuid::new_v4();
    info!(%submission_id, "grant application received");

    let guard = FormGuard {
        honeypot: Some(&app.organization_website),
        timestamp: non_empty(&app.form_timestamp),
        signature: non_empty(&app.form_signature),
    };
    if spam::is_spam(&form_secret, &guard, Utc::now().timestamp_millis()) {
        return Ok(success_response(wants_html, APPLY_FORM_PATH));
    }

    if let Err(errors) = app.validate() {
        let messages = validation_messages(&errors);
        if wants_html {
            return Ok(validation_redirect(
                &state,
                APPLY_FORM_PATH,
                APPLY_DRAFT_COOKIE,
                &application_fields(&app),
                &messages,
                None,
            ));
        }
        return Err(ApiError::Validation(messages));
    }

    let title = format!("Grant application: {}", app.project_name);
    let issue_body = application_issue_body(&app);
    let issue = dispatch(DispatchPolicy::BestEffort, "tracker", async {
        state.tracker.create_application_issue(&title, &issue_body).await
    })
    .await?;
    if let Some(number) = issue {
        info!(issue = number, "application issue created");
    }

    let subject = format!("New grant application: {}", app.project_name);
    dispatch(DispatchPolicy::Required, "email", async {
        if state.mailer.send_internal(&subject, &issue_body).await {
            Ok(())
        } else {
            Err(anyhow!("email provider rejected message"))
        }
    })
    .await?;

    if wants_html {
        let clear = draft_cookie::clear_cookie_header(
            APPLY_DRAFT_COOKIE,
            APPLY_FORM_PATH,
            state.config.production,
        );
        return Ok((
            AppendHeaders([(SET_COOKIE, clear)]),
            Redirect::to(&format!("{APPLY_FORM_PATH}?submitted=true")),
        )
            .into_response());
    }
    Ok(Json(json!({ "message": "success" })).into_response())
}

/// Accept a progress report for an existing grant. Mirrors the application
/// flow, with the grant-number lookup and an issue comment instead of a
/// new issue.
pub async fn submit_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let form_secret =
        require(&state.config.form_token_secret, "FORM_TOKEN_SECRET")?.to_string();
    let wants_html = is_form_encoded(&headers);
    let report: ProgressReport = parse_submission(&headers, &body)?;
    let submission_id = uuid::Uuid::new_v4();
    info!(%submission_id, "progress report received");

    let guard = FormGuard {
        honeypot: Some(&report.organization_website),
        timestamp: non_empty(&report.form_timestamp),
        signature: non_empty(&report.form_signature),
    };
    if spam::is_spam(&form_secret, &guard, Utc::now().timestamp_millis()) {
        return Ok(success_response(wants_html, REPORT_FORM_PATH));
    }

    let report_fields = json!({
        "name": report.name,
        "email": report.email,
        "grant_number": report.grant_number,
        "report": report.report,
    });
    let report_cookie_ttl = Some(REPORT_DRAFT_TTL_DAYS * 24 * 60 * 60);

    let mut messages = match report.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => validation_messages(&errors),
    };
    if !is_valid_grant_number(&report.grant_number) {
        messages.push("grant_number: must be a 6-7 digit grant number".to_string());
        messages.sort();
    }
    if !messages.is_empty() {
        if wants_html {
            return Ok(validation_redirect(
                &state,
                REPORT_FORM_PATH,
                REPORT_DRAFT_COOKIE,
                &report_fields,
                &messages,
                report_cookie_ttl,
            ));
        }
        return Err(ApiError::Validation(messages));
    }

    // Tracker is best-effort throughout: a lookup failure skips the
    // comment, it does not block the report.
    let lookup = dispatch(DispatchPolicy::BestEffort, "tracker", async {
        state.tracker.find_grant_issue(&report.grant_number).await
    })
    .await?;

    let comment = format!(
        "## Progress report\n\nSubmitted by {} ({})\n\n{}\n",
        report.name, report.email, report.report
    );
    match lookup {
        Some(Some(issue)) => {
            dispatch(DispatchPolicy::BestEffort, "tracker", async {
                state.tracker.add_report_comment(issue.number, &comment).await
            })
            .await?;
        }
        Some(None) => {
            let messages = vec!["grant_number: no grant found with this number".to_string()];
            if wants_html {
                return Ok(validation_redirect(
                    &state,
                    REPORT_FORM_PATH,
                    REPORT_DRAFT_COOKIE,
                    &report_fields,
                    &messages,
                    report_cookie_ttl,
                ));
            }
            return Err(ApiError::Validation(messages));
        }
        None => warn!("grant lookup unavailable; report forwarded by email only"),
    }

    let subject = format!("Progress report for grant {}", report.grant_number);
    dispatch(DispatchPolicy::Required, "email", async {
        if state.mailer.send_internal(&subject, &comment).await {
            Ok(())
        } else {
            Err(anyhow!("email provider rejected message"))
        }
    })
    .await?;

    if wants_html {
        let clear = draft_cookie::clear_cookie_header(
            REPORT_DRAFT_COOKIE,
            REPORT_FORM_PATH,
            state.config.production,
        );
        return Ok((
            AppendHeaders([(SET_COOKIE, clear)]),
            Redirect::to(&format!("{REPORT_FORM_PATH}?submitted=true")),
        )
            .into_response());
    }
    Ok(Json(json!({ "message": "success" })).into_response())
}

#[derive(Debug, Deserialize)]
pub struct GrantLookup {
    pub grant_number: String,
}

/// Look a grant up by number in the issue tracker.
pub async fn lookup_grant(
    State(state): State<AppState>,
    Json(lookup): Json<GrantLookup>,
) -> Result<Json<Value>> {
    if !is_valid_grant_number(&lookup.grant_number) {
        return Err(ApiError::Validation(vec![
            "grant_number: must be a 6-7 digit grant number".to_string(),
        ]));
    }
    let issue = state.tracker.find_grant_issue(&lookup.grant_number).await?;
    match issue {
        Some(issue) => Ok(Json(json!({
            "success": true,
            "grant": { "number": issue.number, "title": issue.title, "state": issue.state }
        }))),
        None => Err(ApiError::NotFound("grant")),
    }
}

/// Existence check used by the report form before submission.
pub async fn validate_grant(
    State(state): State<AppState>,
    Json(lookup): Json<GrantLookup>,
) -> Result<Json<Value>> {
    if !is_valid_grant_number(&lookup.grant_number) {
        return Ok(Json(json!({ "valid": false })));
    }
    let issue = state.tracker.find_grant_issue(&lookup.grant_number).await?;
    Ok(Json(json!({ "valid": issue.is_some() })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::formtoken;
    use crate::state::testutil::{full_config, state_with, RecordingMailer, RecordingTracker};
    use crate::tracker::GrantIssue;

    fn state() -> (AppState, Arc<RecordingMailer>, Arc<RecordingTracker>) {
        let mailer = Arc::new(RecordingMailer::default());
        let tracker = Arc::new(RecordingTracker::default());
        let state = state_with(full_config(), mailer.clone(), tracker.clone());
        (state, mailer, tracker)
    }

    /// A token old enough to pass the elapsed-time heuristic.
    fn aged_token() -> (String, String) {
        let token = formtoken::issue("form-token-secret", Utc::now().timestamp_millis() - 15_000);
        (token.timestamp.to_string(), token.signature)
    }

    fn valid_application() -> Value {
        let (ts, sig) = aged_token();
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.org",
            "project_name": "Mesh Relay",
            "project_description": "A relay for mesh networks.",
            "potential_impact": "Resilient communications.",
            "budget": "10000 USD",
            "duration": "6 months",
            "license": "MIT",
            "github": "https://github.com/ada/mesh-relay",
            "form_timestamp": ts,
            "form_signature": sig
        })
    }

    fn json_body(value: &Value) -> Bytes {
        Bytes::from(serde_json::to_vec(value).unwrap())
    }

    #[tokio::test]
    async fn valid_application_creates_issue_and_sends_email() {
        let (state, mailer, tracker) = state();
        let response = apply_grant(State(state), HeaderMap::new(), json_body(&valid_application()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let issues = tracker.issues.lock().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, "Grant application: Mesh Relay");
        assert!(issues[0].1.contains("ada@example.org"));

        let internal = mailer.internal.lock().unwrap();
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].0, "New grant application: Mesh Relay");
    }

    #[tokio::test]
    async fn missing_email_is_validation_error_with_no_tracker_call() {
        let (state, _, tracker) = state();
        let mut application = valid_application();
        application.as_object_mut().unwrap().remove("email");

        let err = apply_grant(State(state), HeaderMap::new(), json_body(&application))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(messages) => {
                assert!(messages.iter().any(|m| m.contains("email")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(tracker.issues.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn honeypot_submission_succeeds_silently() {
        let (state, mailer, tracker) = state();
        let mut application = valid_application();
        application["organization_website"] = json!("https://bot.example");

        let response = apply_grant(State(state), HeaderMap::new(), json_body(&application))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(tracker.issues.lock().unwrap().is_empty());
        assert!(mailer.internal.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fast_submission_is_dropped_silently() {
        let (state, _, tracker) = state();
        let token = formtoken::issue("form-token-secret", Utc::now().timestamp_millis() - 5_000);
        let mut application = valid_application();
        application["form_timestamp"] = json!(token.timestamp.to_string());
        application["form_signature"] = json!(token.signature);

        let response = apply_grant(State(state), HeaderMap::new(), json_body(&application))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(tracker.issues.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn tracker_failure_is_swallowed_but_email_failure_is_500() {
        // Tracker down, email up: request still succeeds.
        let mailer = Arc::new(RecordingMailer::default());
        let tracker = Arc::new(RecordingTracker { fail: true, ..Default::default() });
        let state = state_with(full_config(), mailer.clone(), tracker);
        let response = apply_grant(State(state), HeaderMap::new(), json_body(&valid_application()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mailer.internal.lock().unwrap().len(), 1);

        // Email down: request fails with a dispatch error.
        let mailer = Arc::new(RecordingMailer { fail: true, ..Default::default() });
        let tracker = Arc::new(RecordingTracker::default());
        let state = state_with(full_config(), mailer, tracker);
        let err = apply_grant(State(state), HeaderMap::new(), json_body(&valid_application()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DispatchFailed("email")));
    }

    #[tokio::test]
    async fn form_encoded_validation_failure_redirects_with_draft_cookie() {
        let (state, _, _) = state();
        let (ts, sig) = aged_token();
        let form = serde_urlencoded::to_string([
            ("name", "Ada Lovelace"),
            ("email", ""),
            ("project_name", "Mesh Relay"),
            ("form_timestamp", ts.as_str()),
            ("form_signature", sig.as_str()),
        ])
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/x-www-form-urlencoded".parse().unwrap());

        let response = apply_grant(State(state), headers, Bytes::from(form)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(location.starts_with("/apply?error="));

        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("grant_application_draft="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/apply"));

        // The draft round-trips through the cookie encryption.
        let value = cookie.split(';').next().unwrap().split_once('=').unwrap().1;
        let fields = draft_cookie::decrypt_fields("cookie-secret", value).unwrap();
        assert_eq!(fields["name"], json!("Ada Lovelace"));
        assert_eq!(fields["project_name"], json!("Mesh Relay"));
    }

    #[tokio::test]
    async fn form_encoded_success_clears_draft_and_redirects() {
        let (state, _, _) = state();
        let application = valid_application();
        let pairs: Vec<(String, String)> = application
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
            .collect();
        let form = serde_urlencoded::to_string(&pairs).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/x-www-form-urlencoded".parse().unwrap());

        let response = apply_grant(State(state), headers, Bytes::from(form)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/apply?submitted=true");
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("grant_application_draft=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    fn valid_report() -> Value {
        let (ts, sig) = aged_token();
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.org",
            "grant_number": "482913",
            "report": "Milestone one complete.",
            "form_timestamp": ts,
            "form_signature": sig
        })
    }

    fn tracker_with_grant() -> RecordingTracker {
        RecordingTracker {
            known_grant: Some(GrantIssue {
                number: 42,
                title: "[482913] Mesh Relay".to_string(),
                state: "open".to_string(),
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn report_attaches_comment_and_sends_email() {
        let mailer = Arc::new(RecordingMailer::default());
        let tracker = Arc::new(tracker_with_grant());
        let state = state_with(full_config(), mailer.clone(), tracker.clone());

        let response = submit_report(State(state), HeaderMap::new(), json_body(&valid_report()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let comments = tracker.comments.lock().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].0, 42);
        assert!(comments[0].1.contains("Milestone one complete."));
        assert_eq!(mailer.internal.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn report_for_unknown_grant_is_validation_error() {
        let (state, _, tracker) = state();
        let err = submit_report(State(state), HeaderMap::new(), json_body(&valid_report()))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(messages) => {
                assert!(messages.iter().any(|m| m.contains("no grant found")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(tracker.comments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn report_with_bad_grant_number_is_validation_error() {
        let (state, _, _) = state();
        let mut report = valid_report();
        report["grant_number"] = json!("12ab");
        let err = submit_report(State(state), HeaderMap::new(), json_body(&report))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(messages) => {
                assert!(messages.iter().any(|m| m.contains("6-7 digit")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn report_tracker_outage_still_emails() {
        let mailer = Arc::new(RecordingMailer::default());
        let tracker = Arc::new(RecordingTracker { fail: true, ..Default::default() });
        let state = state_with(full_config(), mailer.clone(), tracker);

        let response = submit_report(State(state), HeaderMap::new(), json_body(&valid_report()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mailer.internal.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lookup_returns_grant_details() {
        let mailer = Arc::new(RecordingMailer::default());
        let tracker = Arc::new(tracker_with_grant());
        let state = state_with(full_config(), mailer, tracker);

        let Json(body) = lookup_grant(
            State(state),
            Json(GrantLookup { grant_number: "482913".to_string() }),
        )
        .await
        .unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["grant"]["number"], json!(42));
    }

    #[tokio::test]
    async fn lookup_unknown_grant_is_not_found() {
        let (state, _, _) = state();
        let err = lookup_grant(
            State(state),
            Json(GrantLookup { grant_number: "482913".to_string() }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("grant")));
    }

    #[tokio::test]
    async fn validate_grant_reports_validity_without_erroring() {
        let mailer = Arc::new(RecordingMailer::default());
        let tracker = Arc::new(tracker_with_grant());
        let state = state_with(full_config(), mailer, tracker);

        let Json(found) = validate_grant(
            State(state.clone()),
            Json(GrantLookup { grant_number: "482913".to_string() }),
        )
        .await
        .unwrap();
        assert_eq!(found["valid"], json!(true));

        let Json(bad_format) = validate_grant(
            State(state),
            Json(GrantLookup { grant_number: "12".to_string() }),
        )
        .await
        .unwrap();
        assert_eq!(bad_format["valid"], json!(false));
    }
}
