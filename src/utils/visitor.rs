// src/utils/visitor.rs

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use uuid::Uuid;

/// Cookie naming the visitor. The value is opaque; it only keys the
/// session store. There are no accounts behind it.
pub const VISITOR_COOKIE: &str = "sid";

// One year. Attempts are much shorter lived, but the visitor id
// itself has no reason to churn.
const COOKIE_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 365;

/// Extracts the visitor id from the request cookies, if present.
pub fn visitor_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name == VISITOR_COOKIE && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Returns the visitor id for this request, minting one when the
/// request carries none. The second element is the `Set-Cookie` value
/// to attach to the response, present only for new visitors.
pub fn ensure_visitor(headers: &HeaderMap) -> (String, Option<String>) {
    match visitor_id(headers) {
        Some(id) => (id, None),
        None => {
            let id = Uuid::new_v4().to_string();
            let cookie = format!(
                "{VISITOR_COOKIE}={id}; HttpOnly; Max-Age={COOKIE_MAX_AGE_SECONDS}; Path=/; SameSite=Lax"
            );
            (id, Some(cookie))
        }
    }
}
