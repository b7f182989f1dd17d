use axum::http::header::HOST;
use axum::http::HeaderMap;
use snip_links::Shortener;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use typed_builder::TypedBuilder;

/// Outcome of checking a dashboard access code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No access code is configured, so the dashboard is off.
    Unconfigured,
    Denied,
    Granted,
}

#[derive(Clone, TypedBuilder)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    /// Secret guarding the dashboard. Empty codes count as unset.
    #[builder(default, setter(transform = |code: Option<String>| code.filter(|c| !c.is_empty())))]
    access_code: Option<String>,
    /// Origin used in generated short URLs, e.g. `https://sn.ip`.
    #[builder(default, setter(transform = |url: Option<String>| url.map(|u| u.trim_end_matches('/').to_string())))]
    public_base_url: Option<String>,
}

impl AppState {
    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Compares `provided` against the configured code in constant time.
    pub fn check_access(&self, provided: Option<&str>) -> Access {
        let Some(expected) = self.access_code.as_deref() else {
            return Access::Unconfigured;
        };

        match provided {
            Some(code) if bool::from(code.as_bytes().ct_eq(expected.as_bytes())) => {
                Access::Granted
            }
            _ => Access::Denied,
        }
    }

    /// The origin short URLs are built on.
    ///
    /// Falls back to the request's `Host` header when no public base URL is
    /// configured.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base) = &self.public_base_url {
            return base.clone();
        }

        let host = headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
            .filter(|proto| *proto == "https" || *proto == "http")
            .unwrap_or("http");
        format!("{}://{}", scheme, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use snip_generator::SeqGenerator;
    use snip_links::{FetchError, FetchedContent, Fetcher, LinkService};
    use snip_storage::MemoryKv;

    struct NoFetch;

    #[async_trait::async_trait]
    impl Fetcher for NoFetch {
        async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError> {
            Err(FetchError::Request {
                url: url.to_string(),
                message: "disabled".to_string(),
            })
        }
    }

    fn shortener() -> Arc<dyn Shortener> {
        Arc::new(LinkService::new(MemoryKv::new(), SeqGenerator::new(), NoFetch))
    }

    #[test]
    fn access_code_gate() {
        let state = AppState::builder()
            .shortener(shortener())
            .access_code(Some("secret".to_string()))
            .build();

        assert_eq!(state.check_access(Some("secret")), Access::Granted);
        assert_eq!(state.check_access(Some("secreT")), Access::Denied);
        assert_eq!(state.check_access(Some("")), Access::Denied);
        assert_eq!(state.check_access(None), Access::Denied);
    }

    #[test]
    fn empty_access_code_is_unconfigured() {
        let state = AppState::builder()
            .shortener(shortener())
            .access_code(Some(String::new()))
            .build();

        assert_eq!(state.check_access(Some("")), Access::Unconfigured);
    }

    #[test]
    fn base_url_prefers_configuration() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("internal:8000"));

        let configured = AppState::builder()
            .shortener(shortener())
            .public_base_url(Some("https://sn.ip/".to_string()))
            .build();
        assert_eq!(configured.base_url(&headers), "https://sn.ip");

        let derived = AppState::builder().shortener(shortener()).build();
        assert_eq!(derived.base_url(&headers), "http://internal:8000");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(derived.base_url(&headers), "https://internal:8000");
    }
}
