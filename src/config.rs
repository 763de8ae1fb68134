use std::env;

use tracing::warn;

use crate::errors::{ApiError, Result};

/// All environment-derived configuration, loaded once at startup.
/// Required secrets stay `Option` so a route that needs an absent one
/// fails the request with a 500 instead of silently skipping verification.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub port: u16,
    pub production: bool,

    // Webhook shared secrets, one per provider/store.
    pub btcpay_webhook_secret: Option<String>,
    pub btcpay_ops_webhook_secret: Option<String>,
    pub stripe_webhook_secret: Option<String>,

    // Transactional email provider.
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_sender: Option<String>,
    pub accounting_email: Option<String>,
    pub sendgrid_api_base: String,

    // Issue tracker.
    pub github_token: Option<String>,
    pub github_org: Option<String>,
    pub github_repo: Option<String>,
    pub github_api_base: String,

    // Public-form protection.
    pub form_token_secret: Option<String>,
    pub cookie_secret: Option<String>,

    // Mailing-list provider.
    pub newsletter_api_key: Option<String>,
    pub newsletter_api_base: Option<String>,
}

fn opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: opt("PORT").and_then(|v| v.parse().ok()).unwrap_or(3000),
            production: opt("APP_ENV").as_deref() == Some("production"),

            btcpay_webhook_secret: opt("BTCPAY_WEBHOOK_SECRET"),
            btcpay_ops_webhook_secret: opt("BTCPAY_OPS_WEBHOOK_SECRET"),
            stripe_webhook_secret: opt("STRIPE_WEBHOOK_SECRET"),

            sendgrid_api_key: opt("SENDGRID_API_KEY"),
            sendgrid_sender: opt("SENDGRID_VERIFIED_SENDER"),
            accounting_email: opt("ACCOUNTING_EMAIL"),
            sendgrid_api_base: opt("SENDGRID_API_BASE")
                .unwrap_or_else(|| "https://api.sendgrid.com".to_string()),

            github_token: opt("GITHUB_TOKEN"),
            github_org: opt("GITHUB_ORG"),
            github_repo: opt("GITHUB_REPO"),
            github_api_base: opt("GITHUB_API_BASE")
                .unwrap_or_else(|| "https://api.github.com".to_string()),

            form_token_secret: opt("FORM_TOKEN_SECRET"),
            cookie_secret: opt("COOKIE_SECRET"),

            newsletter_api_key: opt("NEWSLETTER_API_KEY"),
            newsletter_api_base: opt("NEWSLETTER_API_BASE"),
        }
    }

    /// Log which optional secrets are absent at startup so gaps surface
    /// before the first request hits them. Values are never logged.
    pub fn log_missing(&self) {
        let checks: [(&str, bool); 9] = [
            ("BTCPAY_WEBHOOK_SECRET", self.btcpay_webhook_secret.is_some()),
            ("BTCPAY_OPS_WEBHOOK_SECRET", self.btcpay_ops_webhook_secret.is_some()),
            ("STRIPE_WEBHOOK_SECRET", self.stripe_webhook_secret.is_some()),
            ("SENDGRID_API_KEY", self.sendgrid_api_key.is_some()),
            ("SENDGRID_VERIFIED_SENDER", self.sendgrid_sender.is_some()),
            ("ACCOUNTING_EMAIL", self.accounting_email.is_some()),
            ("GITHUB_TOKEN", self.github_token.is_some()),
            ("FORM_TOKEN_SECRET", self.form_token_secret.is_some()),
            ("COOKIE_SECRET", self.cookie_secret.is_some()),
        ];
        for (name, present) in checks {
            if !present {
                warn!(variable = name, "configuration variable not set; dependent routes will return 500");
            }
        }
    }
}

/// Unwrap a required config value or fail the request with a 500.
pub fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(ApiError::MissingConfig(name))
}
