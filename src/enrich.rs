use crate::sources::PosterSource;
use crate::store::Store;

use tracing::{debug, info, warn};

pub struct Enricher {
    source: Box<dyn PosterSource + Send + Sync>,
    limit: usize,
}

impl Enricher {
    pub fn new(source: Box<dyn PosterSource + Send + Sync>, limit: usize) -> Enricher {
        Enricher { source, limit }
    }

    /// Looks up posters for at most `limit` movies that have none, in catalog order. Failures
    /// leave the poster unset. Returns the number of posters found.
    pub async fn fill_missing_posters(&self, store: &mut Store) -> usize {
        let missing: Vec<String> = store
            .movies
            .iter()
            .filter(|(_, movie)| !movie.has_poster())
            .map(|(key, _)| key.clone())
            .collect();

        if missing.is_empty() {
            info!("  All movies already have posters");
            return 0;
        }

        info!("  Fetching posters for {} movies...", missing.len());

        let mut found = 0;

        for key in missing.iter().take(self.limit) {
            let Some(movie) = store.movies.get_mut(key) else {
                continue;
            };

            if movie.uri.is_empty() {
                debug!("    - {} ({}): no URI", movie.name, movie.year);
                continue;
            }

            match self.source.fetch_poster(&movie.uri).await {
                Ok(Some(poster)) => {
                    info!("    ✓ {} ({})", movie.name, movie.year);
                    movie.poster = Some(poster);
                    found += 1;
                }
                Ok(None) => info!("    - {} ({}): no poster found", movie.name, movie.year),
                Err(err) => warn!(
                    "    - {} ({}): error fetching poster: {}",
                    movie.name, movie.year, err
                ),
            }
        }

        found
    }
}
