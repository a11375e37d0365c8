//! Paste ID discovery from the Pastebin archive page.
//!
//! A sweep starts by scraping the public archive listing once and turning
//! its paste links into validated [`PasteId`]s. Any failure here yields an
//! empty list; the caller decides what an empty sweep means.

mod parser;

use pastewatch_shared::{HttpConfig, PasteId, PastewatchError, Result};
use reqwest::Client;
use tracing::{error, info, instrument};
use url::Url;

pub use parser::parse_archive;

/// Maximum number of redirects to follow when fetching the archive.
const MAX_REDIRECTS: usize = 3;

// ---------------------------------------------------------------------------
// ArchiveScraper
// ---------------------------------------------------------------------------

/// Fetches and parses the archive page.
pub struct ArchiveScraper {
    client: Client,
}

impl ArchiveScraper {
    /// Create a scraper whose client sends the configured User-Agent and timeout.
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(http.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(http.timeout())
            .build()
            .map_err(|e| PastewatchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Discover up to `max` paste IDs from `archive_url`, in page order.
    ///
    /// Network and HTTP-status failures are logged and produce an empty list.
    #[instrument(skip_all, fields(archive_url = %archive_url, max = max))]
    pub async fn discover(&self, archive_url: &Url, max: usize) -> Vec<PasteId> {
        info!("scraping Pastebin archive");

        let html = match self.fetch_archive(archive_url).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "Failed to scrape archive");
                return Vec::new();
            }
        };

        let ids = parse_archive(&html, max);
        info!(count = ids.len(), "Extracted {} paste IDs from archive", ids.len());
        ids
    }

    async fn fetch_archive(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
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
            .map_err(|e| PastewatchError::Network(format!("{url}: failed to read body: {e}")))
    }
}
