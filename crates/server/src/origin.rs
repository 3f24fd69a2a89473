//! # Origin Gate
//!
//! Decides whether a response may be read cross-origin by echoing the
//! request's `Origin` back as `Access-Control-Allow-Origin`.
//!
//! The policy is a fixed allow-list:
//! - listed origin → echo it
//! - no `Origin` header at all → same-origin or non-browser client; allowed,
//!   but there is no value to echo
//! - anything else → no CORS headers, so the browser blocks the read
//!
//! Preflight (`OPTIONS`) responses to allowed requests also list the
//! permitted methods.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

/// Origins allowed when none are configured
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:8080",
    "https://my-app.com",
];

/// Value of `Access-Control-Allow-Methods` on preflight responses
pub const ALLOWED_METHODS: &str = "GET,DELETE,OPTIONS,POST,PATCH,PUT";

/// Outcome of checking one request's origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// Listed origin, echoed back verbatim
    Allow(String),
    /// No `Origin` header was sent
    SameOrigin,
    /// Unlisted origin: emit no CORS headers
    Deny,
}

impl OriginDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, OriginDecision::Deny)
    }

    /// Write the CORS headers this decision calls for
    pub fn apply(&self, headers: &mut HeaderMap, preflight: bool) {
        if let OriginDecision::Allow(origin) = self {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
        }
        if preflight && self.is_allowed() {
            headers.insert(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
        }
    }
}

/// The allow-list policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginGate {
    allowed: Vec<String>,
}

impl OriginGate {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Pure decision on a request's declared origin. Matching is exact.
    pub fn decide(&self, origin: Option<&str>) -> OriginDecision {
        match origin {
            None => OriginDecision::SameOrigin,
            Some(origin) if self.allowed.iter().any(|allowed| allowed == origin) => {
                OriginDecision::Allow(origin.to_string())
            }
            Some(_) => OriginDecision::Deny,
        }
    }
}

impl Default for OriginGate {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ORIGINS.iter().copied())
    }
}

/// Middleware running the gate on every request and decorating the response
pub async fn apply_origin_gate(
    State(gate): State<Arc<OriginGate>>,
    request: Request,
    next: Next,
) -> Response {
    let decision = match request.headers().get(ORIGIN) {
        None => OriginDecision::SameOrigin,
        // An origin that is not even visible ASCII cannot be on the list
        Some(value) => match value.to_str() {
            Ok(origin) => gate.decide(Some(origin)),
            Err(_) => OriginDecision::Deny,
        },
    };
    let preflight = request.method() == Method::OPTIONS;
    debug!(?decision, preflight, "Origin gate");

    let mut response = next.run(request).await;
    decision.apply(response.headers_mut(), preflight);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_origin_is_echoed() {
        let gate = OriginGate::default();
        assert_eq!(
            gate.decide(Some("http://localhost:8080")),
            OriginDecision::Allow("http://localhost:8080".to_string())
        );
    }

    #[test]
    fn test_missing_origin_is_allowed() {
        let gate = OriginGate::default();
        let decision = gate.decide(None);
        assert_eq!(decision, OriginDecision::SameOrigin);
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_unlisted_origin_is_denied() {
        let gate = OriginGate::default();
        assert_eq!(gate.decide(Some("https://evil.example")), OriginDecision::Deny);
        // Exact match only
        assert_eq!(gate.decide(Some("http://localhost:3000/")), OriginDecision::Deny);
    }

    #[test]
    fn test_custom_allow_list() {
        let gate = OriginGate::new(["https://movies.example"]);
        assert!(gate.decide(Some("https://movies.example")).is_allowed());
        assert!(!gate.decide(Some("https://my-app.com")).is_allowed());
    }

    #[test]
    fn test_apply_headers() {
        let mut headers = HeaderMap::new();
        OriginDecision::Allow("https://my-app.com".to_string()).apply(&mut headers, true);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://my-app.com");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);

        let mut headers = HeaderMap::new();
        OriginDecision::Allow("https://my-app.com".to_string()).apply(&mut headers, false);
        assert!(headers.get(ACCESS_CONTROL_ALLOW_METHODS).is_none());

        let mut headers = HeaderMap::new();
        OriginDecision::SameOrigin.apply(&mut headers, true);
        assert!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);

        let mut headers = HeaderMap::new();
        OriginDecision::Deny.apply(&mut headers, true);
        assert!(headers.is_empty());
    }
}
