//! Webhook authentication.
//!
//! The provider authenticates pushes with `Authorization: Bearer {key}`,
//! compared for equality against the configured secret. There is no
//! signature over the payload; the token only proves possession of the
//! shared secret. Kept wire-compatible with the provider contract.

/// Pulls the token out of an `Authorization: Bearer ...` header.
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;
    let rest = header.strip_prefix("Bearer ").or_else(|| header.strip_prefix("bearer "))?;
    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// True when the webhook request carries the configured secret.
pub fn is_authentic(auth_header: Option<&str>, webhook_secret: &str) -> bool {
    match extract_bearer_token(auth_header) {
        Some(token) => token == webhook_secret,
        None => false,
    }
}
