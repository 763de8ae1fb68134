//! Backend for a nonprofit's grant administration: application and
//! progress-report intake, payment-processor webhooks with signature
//! verification, donation receipts, and spam protection for public forms.

pub mod backfill;
pub mod config;
pub mod dispatch;
pub mod donation;
pub mod draft_cookie;
pub mod email;
pub mod errors;
pub mod formtoken;
pub mod routes;
pub mod spam;
pub mod state;
pub mod tracker;
pub mod verification;
