use crate::config::PostersConfig;
use crate::sources::PosterSource;
use crate::Result;

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

pub struct LetterboxdScraper {
    client: reqwest::Client,
}

impl LetterboxdScraper {
    pub fn new(config: &PostersConfig) -> Result<LetterboxdScraper> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(LetterboxdScraper { client })
    }

    /// Returns the `content` of the page's `og:image` meta tag, if any.
    pub fn extract_poster(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = match Selector::parse(r#"meta[property="og:image"]"#) {
            Ok(selector) => selector,
            Err(err) => {
                warn!("Could not parse selector: {}", err);
                return None;
            }
        };

        document
            .select(&selector)
            .find_map(|meta| meta.value().attr("content"))
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToOwned::to_owned)
    }
}

#[async_trait]
impl PosterSource for LetterboxdScraper {
    async fn fetch_poster(&self, uri: &str) -> Result<Option<String>> {
        let response = self.client.get(uri).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Poster page {} returned {}", uri, status);
            return Ok(None);
        }

        let body = response.text().await?;

        Ok(Self::extract_poster(&body))
    }
}
