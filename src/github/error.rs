//! Categorization of octocrab failures into gateway error kinds.
//!
//! The split matters for two callers: the retry loop only retries
//! [`GatewayErrorKind::Transient`] errors, and the synchronizer treats
//! [`GatewayErrorKind::Conflict`] as a run failure rather than retrying a
//! write whose expected-state token went stale.

use crate::gateway::{GatewayError, GatewayErrorKind};

/// Whether an octocrab error is a 404 for the requested resource.
///
/// Callers that accept absence (file and branch lookups) turn these into
/// `Ok(None)`; everywhere else a 404 categorizes as permanent.
pub(crate) fn is_not_found(err: &octocrab::Error) -> bool {
    status_code_of(err) == Some(404)
}

/// Categorizes an octocrab error into a [`GatewayError`].
///
/// - 409 is a stale expected-state token on a contents write (the only
///   request this gateway sends that can conflict) → `Conflict`
/// - 429, rate-limited 403, 5xx, and network-level failures → `Transient`
/// - everything else → `Permanent`
pub(crate) fn categorize(err: octocrab::Error) -> GatewayError {
    let status_code = status_code_of(&err);
    let message = err.to_string();

    let kind = match status_code {
        Some(409) => GatewayErrorKind::Conflict,
        Some(429) => GatewayErrorKind::Transient,
        Some(403) if is_rate_limit_message(&message) => GatewayErrorKind::Transient,
        Some(code) if (500..600).contains(&code) => GatewayErrorKind::Transient,
        Some(_) => GatewayErrorKind::Permanent,
        None => {
            if is_network_message(&message) {
                GatewayErrorKind::Transient
            } else {
                GatewayErrorKind::Permanent
            }
        }
    };

    GatewayError {
        kind,
        status_code,
        message,
        source: Some(Box::new(err)),
    }
}

/// Extracts the HTTP status code from an octocrab error, if present.
///
/// API-level failures carry a structured status; for transport-level
/// variants we fall back to scanning the message for well-known codes.
/// Returning `None` is safe: categorization then depends on the message
/// alone.
fn status_code_of(err: &octocrab::Error) -> Option<u16> {
    if let octocrab::Error::GitHub { source, .. } = err {
        return Some(source.status_code.as_u16());
    }
    status_code_from_message(&err.to_string())
}

/// Scans an error message for an HTTP status code.
fn status_code_from_message(message: &str) -> Option<u16> {
    if let Some(idx) = message.find("status: ") {
        let rest = &message[idx + 8..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(code) = digits.parse() {
            return Some(code);
        }
    }

    let lower = message.to_lowercase();
    for (code, marker) in [
        (404u16, "not found"),
        (409, "conflict"),
        (401, "unauthorized"),
        (403, "forbidden"),
        (429, "too many requests"),
    ] {
        if message.contains(&code.to_string()) && lower.contains(marker) {
            return Some(code);
        }
    }
    None
}

/// Whether an error message indicates a rate limit rather than a real 403.
fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit")
        || lower.contains("api rate")
        || lower.contains("secondary rate")
        || lower.contains("abuse detection")
}

/// Whether an error message indicates a network-level failure.
fn is_network_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("network")
        || lower.contains("dns")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_detection() {
        assert!(is_rate_limit_message("API rate limit exceeded"));
        assert!(is_rate_limit_message("secondary rate limit hit"));
        assert!(is_rate_limit_message("abuse detection mechanism triggered"));
        assert!(!is_rate_limit_message("Permission denied"));
    }

    #[test]
    fn network_message_detection() {
        assert!(is_network_message("connection reset by peer"));
        assert!(is_network_message("DNS resolution failed"));
        assert!(is_network_message("request timed out"));
        assert!(!is_network_message("Validation Failed"));
    }

    #[test]
    fn status_code_from_structured_prefix() {
        assert_eq!(status_code_from_message("status: 502 upstream"), Some(502));
        assert_eq!(status_code_from_message("status: abc"), None);
    }

    #[test]
    fn status_code_from_known_patterns() {
        assert_eq!(status_code_from_message("404 Not Found"), Some(404));
        assert_eq!(status_code_from_message("409 Conflict: is at"), Some(409));
        assert_eq!(status_code_from_message("403 Forbidden"), Some(403));
        assert_eq!(status_code_from_message("some other failure"), None);
    }
}
