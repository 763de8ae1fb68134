use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::state::AppState;

pub const ANONYMOUS: &str = "Anonymous";
pub const NO_EMAIL: &str = "No email provided";

/// BTCPay settlement notification. Only the fields the processor needs are
/// modeled; the metadata map stays loose because donor details may sit at
/// either of two locations inside it.
#[derive(Debug, Deserialize)]
pub struct BtcPayEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "deliveryId")]
    pub delivery_id: Option<String>,
    pub timestamp: Option<i64>,
    #[serde(rename = "storeId")]
    pub store_id: Option<String>,
    #[serde(rename = "invoiceId")]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub metadata: Value,
    pub payment: Option<BtcPayPayment>,
}

#[derive(Debug, Deserialize)]
pub struct BtcPayPayment {
    pub value: Option<String>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
}

/// Stripe event envelope as delivered to the webhook. `data.object` is the
/// checkout session for the one event type we act on.
#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: Value,
}

/// A settled donation, normalized across providers and ready for receipt
/// dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub donor_name: String,
    pub donor_email: String,
    pub fund: String,
    pub transaction_id: String,
    pub amount: String,
    pub currency: String,
    pub payment_method: String,
    pub settled_at: DateTime<Utc>,
}

fn metadata_str<'a>(metadata: &'a Value, key: &str) -> Option<&'a str> {
    // Donor details appear either at the top level of metadata or nested
    // under posData, depending on which checkout UI produced the invoice.
    metadata
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            metadata
                .get("posData")
                .and_then(|pos| pos.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
        })
}

impl Donation {
    /// Interpret a verified BTCPay event. Returns `None` for every event
    /// type other than a payment settlement — those are acknowledged
    /// upstream with no side effects.
    pub fn from_btcpay(event: &BtcPayEvent, default_fund: &str) -> Option<Donation> {
        if event.event_type != "InvoicePaymentSettled" {
            return None;
        }

        let donor_name = metadata_str(&event.metadata, "buyerName")
            .unwrap_or(ANONYMOUS)
            .to_string();
        let donor_email = metadata_str(&event.metadata, "buyerEmail")
            .unwrap_or(NO_EMAIL)
            .to_string();
        let fund = metadata_str(&event.metadata, "fund")
            .or_else(|| metadata_str(&event.metadata, "itemDesc"))
            .unwrap_or(default_fund)
            .to_string();

        let payment = event.payment.as_ref();
        // BTCPay reports the amount already in a human-readable unit.
        let amount = payment
            .and_then(|p| p.value.clone())
            .unwrap_or_else(|| "0".to_string());
        let payment_method = payment
            .and_then(|p| p.payment_method.clone())
            .unwrap_or_else(|| "BTC".to_string());

        let settled_at = event
            .timestamp
            .and_then(|t| Utc.timestamp_opt(t, 0).single())
            .unwrap_or_else(Utc::now);

        Some(Donation {
            donor_name,
            donor_email,
            fund,
            transaction_id: event.invoice_id.clone().unwrap_or_default(),
            amount,
            currency: "BTC".to_string(),
            payment_method,
            settled_at,
        })
    }

    /// Interpret a verified Stripe event. Only completed checkout sessions
    /// count as settled donations. Stripe reports amounts in minor units;
    /// USD is the one supported currency, so divide by 100.
    pub fn from_stripe(event: &StripeEvent) -> Option<Donation> {
        if event.event_type != "checkout.session.completed" {
            return None;
        }
        let session = &event.data.object;

        let details = session.get("customer_details");
        let donor_name = details
            .and_then(|d| d.get("name"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();
        let donor_email = details
            .and_then(|d| d.get("email"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(NO_EMAIL)
            .to_string();

        let fund = session
            .get("metadata")
            .and_then(|m| m.get("fund_name"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("General Fund")
            .to_string();

        let cents = session.get("amount_total").and_then(Value::as_i64).unwrap_or(0);
        let amount = format!("{:.2}", cents as f64 / 100.0);

        let transaction_id = session
            .get("payment_intent")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| event.id.clone());

        let settled_at = session
            .get("created")
            .and_then(Value::as_i64)
            .and_then(|t| Utc.timestamp_opt(t, 0).single())
            .unwrap_or_else(Utc::now);

        Some(Donation {
            donor_name,
            donor_email,
            fund,
            transaction_id,
            amount,
            currency: "USD".to_string(),
            payment_method: "Card".to_string(),
            settled_at,
        })
    }

    /// Receipt number derived from the tail of the transaction id.
    pub fn receipt_number(&self) -> String {
        let id = &self.transaction_id;
        let tail: String = id.chars().rev().take(8).collect::<Vec<_>>().into_iter().rev().collect();
        tail.to_uppercase()
    }

    pub fn has_donor_email(&self) -> bool {
        self.donor_email != NO_EMAIL
    }
}

/// Mask an email address for logs: "a@b.com" becomes "a***@b***.com".
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return "***".to_string();
    };
    let local_masked = match local.chars().next() {
        Some(c) => format!("{c}***"),
        None => "***".to_string(),
    };
    let domain_masked = match domain.split_once('.') {
        Some((label, rest)) => {
            let head = label.chars().next().map(|c| c.to_string()).unwrap_or_default();
            format!("{head}***.{rest}")
        }
        None => "***".to_string(),
    };
    format!("{local_masked}@{domain_masked}")
}

/// Mask a donor name for logs, keeping only the first character.
pub fn mask_name(name: &str) -> String {
    match name.chars().next() {
        Some(c) => format!("{c}***"),
        None => "***".to_string(),
    }
}

/// Dispatch receipt and internal notification for a settled donation.
/// Email failures are logged and swallowed; the webhook still acknowledges
/// 200 so the sender does not enter a retry storm.
pub async fn process_settled_donation(state: &AppState, donation: &Donation) {
    info!(
        donor = %mask_name(&donation.donor_name),
        email = %mask_email(&donation.donor_email),
        fund = %donation.fund,
        amount = %donation.amount,
        currency = %donation.currency,
        "processing settled donation"
    );

    if donation.has_donor_email() {
        if !state.mailer.send_donation_receipt(donation).await {
            warn!(receipt = %donation.receipt_number(), "donor receipt dispatch failed");
        }
    } else {
        info!("donation carried no email; skipping donor receipt");
    }

    if !state.mailer.send_donation_notification(donation).await {
        warn!(receipt = %donation.receipt_number(), "accounting notification dispatch failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settled_event(metadata: Value) -> BtcPayEvent {
        BtcPayEvent {
            event_type: "InvoicePaymentSettled".to_string(),
            delivery_id: Some("dlv_1".to_string()),
            timestamp: Some(1_700_000_000),
            store_id: Some("store_1".to_string()),
            invoice_id: Some("inv_AbCdEf123456".to_string()),
            metadata,
            payment: Some(BtcPayPayment {
                value: Some("0.001".to_string()),
                payment_method: Some("BTC-OnChain".to_string()),
            }),
        }
    }

    #[test]
    fn btcpay_settlement_extracts_donor() {
        let event = settled_event(json!({ "buyerName": "A B", "buyerEmail": "a@b.com" }));
        let donation = Donation::from_btcpay(&event, "General Fund").unwrap();
        assert_eq!(donation.donor_name, "A B");
        assert_eq!(donation.donor_email, "a@b.com");
        assert_eq!(donation.amount, "0.001");
        assert_eq!(donation.currency, "BTC");
        assert_eq!(donation.payment_method, "BTC-OnChain");
    }

    #[test]
    fn btcpay_donor_fallback_to_pos_data() {
        let event = settled_event(json!({
            "posData": { "buyerName": "Nested", "buyerEmail": "n@x.org" }
        }));
        let donation = Donation::from_btcpay(&event, "General Fund").unwrap();
        assert_eq!(donation.donor_name, "Nested");
        assert_eq!(donation.donor_email, "n@x.org");
    }

    #[test]
    fn btcpay_missing_donor_uses_defaults() {
        let event = settled_event(json!({}));
        let donation = Donation::from_btcpay(&event, "Operations Fund").unwrap();
        assert_eq!(donation.donor_name, ANONYMOUS);
        assert_eq!(donation.donor_email, NO_EMAIL);
        assert_eq!(donation.fund, "Operations Fund");
        assert!(!donation.has_donor_email());
    }

    #[test]
    fn btcpay_non_settlement_is_ignored() {
        let mut event = settled_event(json!({}));
        event.event_type = "InvoiceCreated".to_string();
        assert!(Donation::from_btcpay(&event, "General Fund").is_none());
    }

    #[test]
    fn receipt_number_is_last_eight_uppercased() {
        let event = settled_event(json!({}));
        let donation = Donation::from_btcpay(&event, "General Fund").unwrap();
        assert_eq!(donation.receipt_number(), "EF123456");
    }

    #[test]
    fn stripe_checkout_completed_extracts_donation() {
        let event = StripeEvent {
            id: "evt_1".to_string(),
            event_type: "checkout.session.completed".to_string(),
            data: StripeEventData {
                object: json!({
                    "payment_intent": "pi_3OabcDEF12345678",
                    "amount_total": 2500,
                    "currency": "usd",
                    "created": 1_700_000_000,
                    "customer_details": { "name": "C D", "email": "c@d.io" },
                    "metadata": { "fund_name": "Education Fund" }
                }),
            },
        };
        let donation = Donation::from_stripe(&event).unwrap();
        assert_eq!(donation.amount, "25.00");
        assert_eq!(donation.currency, "USD");
        assert_eq!(donation.fund, "Education Fund");
        assert_eq!(donation.transaction_id, "pi_3OabcDEF12345678");
        assert_eq!(donation.receipt_number(), "12345678");
    }

    #[test]
    fn stripe_other_event_types_ignored() {
        let event = StripeEvent {
            id: "evt_2".to_string(),
            event_type: "payment_intent.created".to_string(),
            data: StripeEventData { object: json!({}) },
        };
        assert!(Donation::from_stripe(&event).is_none());
    }

    #[test]
    fn email_masking_matches_expected_shape() {
        assert_eq!(mask_email("a@b.com"), "a***@b***.com");
        assert_eq!(mask_email("donor@example.org"), "d***@e***.org");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email("@nodomain"), "***@***");
    }

    #[test]
    fn name_masking_keeps_first_char() {
        assert_eq!(mask_name("Alice"), "A***");
        assert_eq!(mask_name(""), "***");
    }
}
