use tracing::info;

use crate::formtoken;

/// Anti-abuse fields pulled from a public form submission: the honeypot
/// value plus the hidden token pair.
#[derive(Debug, Default)]
pub struct FormGuard<'a> {
    pub honeypot: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

/// Combined spam decision for a public form submission. A non-empty
/// honeypot flags spam regardless of token validity; otherwise the form
/// token must verify. Reasons go to the log only — callers respond with
/// success either way so automated senders get no signal.
pub fn is_spam(secret: &str, guard: &FormGuard<'_>, now_ms: i64) -> bool {
    if let Some(value) = guard.honeypot {
        if !value.trim().is_empty() {
            info!("honeypot field filled; dropping submission");
            return true;
        }
    }

    let (timestamp, signature) = match (guard.timestamp, guard.signature) {
        (Some(t), Some(s)) => (t, s),
        _ => {
            info!("form token fields absent; dropping submission");
            return true;
        }
    };

    let check = formtoken::verify(secret, timestamp, signature, now_ms);
    if !check.valid {
        info!(reason = check.reason.unwrap_or("unknown"), "form token rejected; dropping submission");
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formtoken::issue;

    const SECRET: &str = "form-token-secret";

    #[test]
    fn filled_honeypot_is_spam_even_with_valid_token() {
        let token = issue(SECRET, 1_000_000);
        let ts = token.timestamp.to_string();
        let guard = FormGuard {
            honeypot: Some("https://bot.example"),
            timestamp: Some(&ts),
            signature: Some(&token.signature),
        };
        assert!(is_spam(SECRET, &guard, 1_000_000 + 60_000));
    }

    #[test]
    fn fast_submission_is_spam() {
        let token = issue(SECRET, 1_000_000);
        let ts = token.timestamp.to_string();
        let guard = FormGuard {
            honeypot: Some(""),
            timestamp: Some(&ts),
            signature: Some(&token.signature),
        };
        assert!(is_spam(SECRET, &guard, 1_000_000 + 5_000));
    }

    #[test]
    fn slow_valid_submission_is_not_spam() {
        let token = issue(SECRET, 1_000_000);
        let ts = token.timestamp.to_string();
        let guard = FormGuard {
            honeypot: None,
            timestamp: Some(&ts),
            signature: Some(&token.signature),
        };
        assert!(!is_spam(SECRET, &guard, 1_000_000 + 15_000));
    }

    #[test]
    fn missing_token_fields_are_spam() {
        let guard = FormGuard::default();
        assert!(is_spam(SECRET, &guard, 1_000_000));
    }
}
