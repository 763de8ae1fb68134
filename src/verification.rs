use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 over `message` and return the hex digest.
pub fn hmac_sha256_hex(secret: &str, message: &[u8]) -> String {
    // HMAC-SHA256 accepts keys of any size per RFC 2104, so new_from_slice
    // cannot fail here.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time byte comparison. Length mismatch returns false immediately;
/// the constant-time property only matters once lengths agree.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Verify a BTCPay-style HMAC signature header of the form "sha256=<hex>"
/// against the raw body bytes. Malformed input of any kind (missing prefix,
/// odd-length or non-hex digest, wrong digest length) is a verification
/// failure, never a panic.
pub fn verify_hmac_signature(secret: &str, body: &[u8], signature_header: &str) -> bool {
    let supplied_hex = match signature_header.strip_prefix("sha256=") {
        Some(h) => h,
        None => return false,
    };
    let supplied = match hex::decode(supplied_hex) {
        Ok(b) => b,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(body);
    let computed = mac.finalize().into_bytes();

    constant_time_eq(&supplied, &computed)
}

/// Parsed `stripe-signature` header: a unix timestamp plus one or more
/// v1 signature candidates.
#[derive(Debug)]
pub struct StripeSignature {
    pub timestamp: i64,
    pub v1: Vec<String>,
}

/// Parse a header of the form "t=1712345678,v1=<hex>[,v1=<hex>...]".
/// Unknown scheme entries (v0 etc.) are ignored, matching the provider's
/// own verifier.
pub fn parse_stripe_header(header: &str) -> Option<StripeSignature> {
    let mut timestamp = None;
    let mut v1 = Vec::new();
    for part in header.split(',') {
        let (key, value) = part.trim().split_once('=')?;
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => v1.push(value.to_string()),
            _ => {}
        }
    }
    let timestamp = timestamp?;
    if v1.is_empty() {
        return None;
    }
    Some(StripeSignature { timestamp, v1 })
}

/// Maximum clock skew accepted between the header timestamp and now,
/// matching the provider SDK's default.
pub const STRIPE_TOLERANCE_SECS: i64 = 300;

/// Verify a `stripe-signature` header against the raw body. The signed
/// payload is "<timestamp>.<body>"; any v1 candidate may match. Returns
/// false on malformed headers or stale timestamps.
pub fn verify_stripe_signature(secret: &str, body: &[u8], header: &str, now_unix: i64) -> bool {
    let sig = match parse_stripe_header(header) {
        Some(s) => s,
        None => return false,
    };
    if (now_unix - sig.timestamp).abs() > STRIPE_TOLERANCE_SECS {
        return false;
    }

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(sig.timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    let computed = mac.finalize().into_bytes();

    sig.v1.iter().any(|candidate| match hex::decode(candidate) {
        Ok(bytes) => constant_time_eq(&bytes, &computed),
        Err(_) => false,
    })
}
