//! Single-paste fetcher for Pastebin's raw endpoint.

use reqwest::Client;
use tracing::{debug, error, info};

use pastewatch_shared::{HttpConfig, PASTE_ID_PLACEHOLDER, PasteId, PastewatchError, Result};

/// Maximum number of redirects to follow per paste.
const MAX_REDIRECTS: usize = 3;

/// Fetches raw paste bodies by ID.
pub struct PasteFetcher {
    client: Client,
    raw_url_template: String,
}

impl PasteFetcher {
    /// Create a fetcher that expands `raw_url_template` (containing `{id}`)
    /// for each paste.
    pub fn new(http: &HttpConfig, raw_url_template: impl Into<String>) -> Result<Self> {
        let raw_url_template = raw_url_template.into();
        if !raw_url_template.contains(PASTE_ID_PLACEHOLDER) {
            return Err(PastewatchError::validation(format!(
                "raw URL template '{raw_url_template}' has no {PASTE_ID_PLACEHOLDER} placeholder"
            )));
        }

        let client = Client::builder()
            .user_agent(http.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(http.timeout())
            .build()
            .map_err(|e| PastewatchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            raw_url_template,
        })
    }

    /// Canonical raw-content URL for `id`.
    pub fn raw_url(&self, id: &PasteId) -> String {
        self.raw_url_template.replace(PASTE_ID_PLACEHOLDER, id.as_str())
    }

    /// Fetch the raw body of `id`.
    ///
    /// Returns `None` on any network error or non-success status; the
    /// failure is logged here so callers can move on to the next paste.
    pub async fn fetch(&self, id: &PasteId) -> Option<String> {
        match self.try_fetch(id).await {
            Ok(body) => {
                info!(paste_id = %id, bytes = body.len(), "Successfully fetched paste {id}");
                Some(body)
            }
            Err(e) => {
                error!(paste_id = %id, error = %e, "Failed to fetch paste {id}");
                None
            }
        }
    }

    async fn try_fetch(&self, id: &PasteId) -> Result<String> {
        let url = self.raw_url(id);
        debug!(%url, "fetching paste");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PastewatchError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PastewatchError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| PastewatchError::Network(format!("{url}: body read failed: {e}")))
    }
}

#[cfg(test)]
mod fetcher_tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn id(raw: &str) -> PasteId {
        PasteId::parse(raw).unwrap()
    }

    fn fetcher_for(server: &MockServer) -> PasteFetcher {
        PasteFetcher::new(&HttpConfig::default(), format!("{}/raw/{{id}}", server.uri())).unwrap()
    }

    #[test]
    fn test_raw_url_default_template() {
        let fetcher =
            PasteFetcher::new(&HttpConfig::default(), "https://pastebin.com/raw/{id}").unwrap();
        assert_eq!(
            fetcher.raw_url(&id("AbCdEfGh")),
            "https://pastebin.com/raw/AbCdEfGh"
        );
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let result = PasteFetcher::new(&HttpConfig::default(), "https://pastebin.com/raw/");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        let http = HttpConfig::default();

        Mock::given(method("GET"))
            .and(path("/raw/AbCdEfGh"))
            .and(header("user-agent", http.user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("send ETH to 0xdeadbeef"))
            .expect(1)
            .mount(&server)
            .await;

        let body = fetcher_for(&server).fetch(&id("AbCdEfGh")).await;
        assert_eq!(body.as_deref(), Some("send ETH to 0xdeadbeef"));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw/12345678"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(fetcher_for(&server).fetch(&id("12345678")).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(fetcher_for(&server).fetch(&id("Qw3rTy7U")).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw/xY9kLm2Q"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let http = HttpConfig {
            timeout_secs: 1,
            ..HttpConfig::default()
        };
        let fetcher = PasteFetcher::new(&http, format!("{}/raw/{{id}}", server.uri())).unwrap();
        assert!(fetcher.fetch(&id("xY9kLm2Q")).await.is_none());
    }
}
