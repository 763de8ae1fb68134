use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use axum::http::HeaderMap;
use base64::Engine as _;
use rand::Rng;
use sha2::{Digest, Sha256};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

pub const APPLY_DRAFT_COOKIE: &str = "grant_application_draft";
pub const REPORT_DRAFT_COOKIE: &str = "grant_report_draft";

/// Report drafts outlive the browser session; anything older than this is
/// discarded on read.
pub const REPORT_DRAFT_TTL_DAYS: i64 = 30;

fn derive_key(secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

/// Encrypt a JSON field map for storage in a cookie. Wire form is
/// "<iv-hex>:<ciphertext-base64>" with a fresh random IV per call — CBC
/// security depends on never reusing one.
pub fn encrypt_fields(secret: &str, fields: &serde_json::Value) -> String {
    let key = derive_key(secret);
    let iv: [u8; 16] = rand::rng().random();
    let plaintext = fields.to_string();

    let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    format!(
        "{}:{}",
        hex::encode(iv),
        base64::engine::general_purpose::STANDARD.encode(ciphertext)
    )
}

/// Reverse of `encrypt_fields`. Any structural, decryption, or parse
/// failure yields `None` — callers treat a bad draft exactly like a
/// missing one and render an empty form.
pub fn decrypt_fields(secret: &str, value: &str) -> Option<serde_json::Value> {
    let (iv_hex, ct_b64) = value.split_once(':')?;
    let iv_bytes = hex::decode(iv_hex).ok()?;
    let iv: [u8; 16] = iv_bytes.try_into().ok()?;
    let ciphertext = base64::engine::general_purpose::STANDARD.decode(ct_b64).ok()?;

    let key = derive_key(secret);
    let plaintext = Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .ok()?;
    let text = String::from_utf8(plaintext).ok()?;
    serde_json::from_str(&text).ok()
}

/// Wrap report-draft fields in an envelope carrying the save time, so the
/// 30-day expiry can be checked on read.
pub fn encrypt_report_draft(secret: &str, fields: &serde_json::Value, now_ms: i64) -> String {
    let envelope = serde_json::json!({ "saved_at": now_ms, "fields": fields });
    encrypt_fields(secret, &envelope)
}

/// Unwrap a report-draft envelope, discarding expired drafts.
pub fn decrypt_report_draft(secret: &str, value: &str, now_ms: i64) -> Option<serde_json::Value> {
    let envelope = decrypt_fields(secret, value)?;
    let saved_at = envelope.get("saved_at")?.as_i64()?;
    let ttl_ms = REPORT_DRAFT_TTL_DAYS * 24 * 60 * 60 * 1000;
    if now_ms - saved_at > ttl_ms {
        return None;
    }
    envelope.get("fields").cloned()
}

/// Build a Set-Cookie value for an encrypted draft: httpOnly, scoped to the
/// form path, SameSite=Lax, Secure in production. `max_age` of `None` means
/// browser-session expiry.
pub fn set_cookie_header(name: &str, value: &str, path: &str, secure: bool, max_age_secs: Option<i64>) -> String {
    let mut cookie = format!("{name}={value}; HttpOnly; Path={path}; SameSite=Lax");
    if let Some(secs) = max_age_secs {
        cookie.push_str(&format!("; Max-Age={secs}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Overwrite a draft cookie with an empty value that expires immediately.
pub fn clear_cookie_header(name: &str, path: &str, secure: bool) -> String {
    set_cookie_header(name, "", path, secure, Some(0))
}

/// Pull a named cookie value out of the request's Cookie header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}
