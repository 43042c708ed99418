//! Endpoint URLs
//!
//! Every URL the client calls is derived from one base URL.

use chrono::{DateTime, Utc};

/// Base URL used when none is configured (same-origin reverse proxy)
pub const DEFAULT_API_BASE: &str = "/api";

/// Normalize a configured base URL.
///
/// Unset, blank or the literal string `"undefined"` (what an unset build-time
/// variable turns into in some toolchains) fall back to [`DEFAULT_API_BASE`].
pub fn resolve_base_url(configured: Option<&str>) -> String {
    match configured.map(str::trim) {
        Some(url) if !url.is_empty() && url != "undefined" => url.trim_end_matches('/').to_string(),
        _ => DEFAULT_API_BASE.to_string(),
    }
}

/// The fixed set of backend endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: resolve_base_url(Some(base_url)),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn signin(&self) -> String {
        format!("{}/user/signin", self.base)
    }

    pub fn signup(&self) -> String {
        format!("{}/user", self.base)
    }

    pub fn profile(&self) -> String {
        format!("{}/user/profile", self.base)
    }

    pub fn threads(&self) -> String {
        format!("{}/chat/thread", self.base)
    }

    pub fn thread(&self, thread_id: &str) -> String {
        format!("{}/chat/thread/{}", self.base, urlencoding::encode(thread_id))
    }

    pub fn thread_query(&self, thread_id: &str) -> String {
        format!("{}/query", self.thread(thread_id))
    }

    pub fn usage(&self) -> String {
        format!("{}/billing/usage", self.base)
    }

    /// Date-filtered usage; bounds are sent as percent-encoded RFC 3339
    pub fn usage_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}/billing/usage/range/{}/{}",
            self.base,
            urlencoding::encode(&start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            urlencoding::encode(&end.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_resolve_base_url_fallbacks() {
        assert_eq!(resolve_base_url(None), "/api");
        assert_eq!(resolve_base_url(Some("")), "/api");
        assert_eq!(resolve_base_url(Some("undefined")), "/api");
        assert_eq!(
            resolve_base_url(Some("https://chat.example.com/api/")),
            "https://chat.example.com/api"
        );
    }

    #[test]
    fn test_endpoint_paths() {
        let endpoints = Endpoints::new("http://localhost:8080");

        assert_eq!(endpoints.signin(), "http://localhost:8080/user/signin");
        assert_eq!(endpoints.signup(), "http://localhost:8080/user");
        assert_eq!(endpoints.profile(), "http://localhost:8080/user/profile");
        assert_eq!(endpoints.threads(), "http://localhost:8080/chat/thread");
        assert_eq!(endpoints.thread("t_1"), "http://localhost:8080/chat/thread/t_1");
        assert_eq!(
            endpoints.thread_query("t_1"),
            "http://localhost:8080/chat/thread/t_1/query"
        );
        assert_eq!(endpoints.usage(), "http://localhost:8080/billing/usage");
    }

    #[test]
    fn test_usage_range_is_encoded() {
        let endpoints = Endpoints::default();
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap();

        assert_eq!(
            endpoints.usage_range(start, end),
            "/api/billing/usage/range/2024-07-01T00%3A00%3A00Z/2024-07-31T23%3A59%3A59Z"
        );
    }
}
