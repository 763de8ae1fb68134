use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, warn};

use crate::config::Config;
use crate::donation::Donation;

/// Outbound email seam. Handlers hold this as a trait object so tests can
/// substitute a recording fake for the real provider client.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Templated donor receipt. Returns false on any provider failure.
    async fn send_donation_receipt(&self, donation: &Donation) -> bool;
    /// Internal notification to the fixed accounting recipient.
    async fn send_donation_notification(&self, donation: &Donation) -> bool;
    /// Internal notification for grant applications and progress reports.
    async fn send_internal(&self, subject: &str, body: &str) -> bool;
}

pub struct SendGridMailer {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl SendGridMailer {
    pub fn new(config: Arc<Config>, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    /// POST a single-recipient message to the provider. All click/open/
    /// subscription tracking is disabled to keep donor mail untouched.
    /// Never propagates an error past this boundary.
    async fn send(&self, to: &str, subject: &str, body: &str) -> bool {
        let (api_key, sender) = match (&self.config.sendgrid_api_key, &self.config.sendgrid_sender) {
            (Some(k), Some(s)) => (k, s),
            _ => {
                warn!("email provider not configured; skipping send");
                return false;
            }
        };

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": sender },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
            "tracking_settings": {
                "click_tracking": { "enable": false, "enable_text": false },
                "open_tracking": { "enable": false },
                "subscription_tracking": { "enable": false }
            }
        });

        let url = format!("{}/v3/mail/send", self.config.sendgrid_api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                error!(%status, body = %text, "email provider rejected message");
                false
            }
            Err(err) => {
                error!(error = %err, "email provider request failed");
                false
            }
        }
    }
}

fn receipt_body(donation: &Donation) -> String {
    format!(
        "Dear {name},\n\n\
         Thank you for your donation to {fund}.\n\n\
         Receipt number: {receipt}\n\
         Date: {date}\n\
         Payment method: {method}\n\
         Amount: {amount} {currency}\n\n\
         No goods or services were provided in exchange for this contribution.\n",
        name = donation.donor_name,
        fund = donation.fund,
        receipt = donation.receipt_number(),
        date = donation.settled_at.format("%B %-d, %Y"),
        method = donation.payment_method,
        amount = donation.amount,
        currency = donation.currency,
    )
}

fn notification_body(donation: &Donation) -> String {
    format!(
        "New settled donation.\n\n\
         Fund: {fund}\n\
         Amount: {amount} {currency}\n\
         Method: {method}\n\
         Receipt: {receipt}\n\
         Transaction: {txn}\n\
         Date: {date}\n",
        fund = donation.fund,
        amount = donation.amount,
        currency = donation.currency,
        method = donation.payment_method,
        receipt = donation.receipt_number(),
        txn = donation.transaction_id,
        date = donation.settled_at.format("%Y-%m-%d"),
    )
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_donation_receipt(&self, donation: &Donation) -> bool {
        let subject = format!("Your donation receipt — {}", donation.fund);
        self.send(&donation.donor_email, &subject, &receipt_body(donation))
            .await
    }

    async fn send_donation_notification(&self, donation: &Donation) -> bool {
        let Some(accounting) = self.config.accounting_email.as_deref() else {
            warn!("accounting recipient not configured; skipping notification");
            return false;
        };
        let subject = format!(
            "Donation settled: {} {} ({})",
            donation.amount, donation.currency, donation.fund
        );
        self.send(accounting, &subject, &notification_body(donation)).await
    }

    async fn send_internal(&self, subject: &str, body: &str) -> bool {
        let Some(accounting) = self.config.accounting_email.as_deref() else {
            warn!("accounting recipient not configured; skipping notification");
            return false;
        };
        self.send(accounting, subject, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn donation() -> Donation {
        Donation {
            donor_name: "A B".to_string(),
            donor_email: "a@b.com".to_string(),
            fund: "General Fund".to_string(),
            transaction_id: "inv_AbCdEf123456".to_string(),
            amount: "0.001".to_string(),
            currency: "BTC".to_string(),
            payment_method: "BTC-OnChain".to_string(),
            settled_at: Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn receipt_body_carries_all_dynamic_fields() {
        let body = receipt_body(&donation());
        assert!(body.contains("A B"));
        assert!(body.contains("General Fund"));
        assert!(body.contains("EF123456"));
        assert!(body.contains("March 5, 2026"));
        assert!(body.contains("BTC-OnChain"));
        assert!(body.contains("0.001 BTC"));
    }

    #[test]
    fn notification_body_carries_transaction() {
        let body = notification_body(&donation());
        assert!(body.contains("inv_AbCdEf123456"));
        assert!(body.contains("0.001 BTC"));
        assert!(body.contains("2026-03-05"));
    }

    #[tokio::test]
    async fn unconfigured_mailer_short_circuits_to_false() {
        let mailer = SendGridMailer::new(Arc::new(Config::default()), reqwest::Client::new());
        assert!(!mailer.send_donation_receipt(&donation()).await);
        assert!(!mailer.send_donation_notification(&donation()).await);
        assert!(!mailer.send_internal("s", "b").await);
    }
}
