use crate::Result;

use async_trait::async_trait;

pub mod letterboxd_scraper;

pub use letterboxd_scraper::LetterboxdScraper;

/// Looks up a poster image URL for a movie detail page.
#[async_trait]
pub trait PosterSource {
    /// `Ok(None)` means the page was reachable but carried no usable poster.
    async fn fetch_poster(&self, uri: &str) -> Result<Option<String>>;
}
