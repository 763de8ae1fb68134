use serde::Serialize;

use crate::verification::hmac_sha256_hex;

/// Minimum time a human is expected to spend on the form before
/// submitting. Anything faster is treated as automated.
pub const MIN_FILL_MS: i64 = 10_000;

/// Signed timestamp embedded in hidden form fields at render time.
#[derive(Debug, Clone, Serialize)]
pub struct FormToken {
    pub timestamp: i64,
    pub signature: String,
}

/// Issue a token for the current instant. The signature covers the decimal
/// millisecond timestamp string.
pub fn issue(secret: &str, now_ms: i64) -> FormToken {
    FormToken {
        timestamp: now_ms,
        signature: hmac_sha256_hex(secret, now_ms.to_string().as_bytes()),
    }
}

/// Outcome of verifying a submitted token. `reason` is for server logs
/// only and must never reach the end user.
#[derive(Debug, PartialEq, Eq)]
pub struct TokenCheck {
    pub valid: bool,
    pub reason: Option<&'static str>,
}

impl TokenCheck {
    fn ok() -> Self {
        Self { valid: true, reason: None }
    }

    fn fail(reason: &'static str) -> Self {
        Self { valid: false, reason: Some(reason) }
    }
}

/// Verify a token submitted from hidden form fields. The timestamp must be
/// a positive integer, the signature must match the recomputed HMAC, and at
/// least `MIN_FILL_MS` must have elapsed (boundary inclusive).
pub fn verify(secret: &str, timestamp: &str, signature: &str, now_ms: i64) -> TokenCheck {
    let ts: i64 = match timestamp.parse() {
        Ok(t) => t,
        Err(_) => return TokenCheck::fail("timestamp is not numeric"),
    };
    if ts <= 0 {
        return TokenCheck::fail("timestamp is not positive");
    }

    let expected = hmac_sha256_hex(secret, timestamp.as_bytes());
    // Both sides are hex digests of fixed length; compare the decoded bytes
    // so the comparison stays constant-time.
    let supplied = match hex::decode(signature) {
        Ok(b) => b,
        Err(_) => return TokenCheck::fail("signature is not valid hex"),
    };
    let expected_bytes = hex::decode(&expected).expect("digest is valid hex");
    if supplied.len() != expected_bytes.len() {
        return TokenCheck::fail("signature length mismatch");
    }
    let mut diff = 0u8;
    for (a, b) in supplied.iter().zip(expected_bytes.iter()) {
        diff |= a ^ b;
    }
    if diff != 0 {
        return TokenCheck::fail("signature mismatch");
    }

    if now_ms - ts < MIN_FILL_MS {
        return TokenCheck::fail("submitted too quickly");
    }
    TokenCheck::ok()
}
