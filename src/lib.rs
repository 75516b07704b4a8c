mod archive;
mod config;
mod enrich;
mod error;
mod merge;
mod options;
pub mod sources;
mod store;
pub mod username;

pub use archive::{parse_csv, Archive, ListKind, UserExport};
pub use config::Config;
pub use enrich::Enricher;
pub use error::ProcessorError;
pub use merge::{Merge, MergeStats};
pub use options::RunOptions;
pub use store::{Movie, MovieUser, Record, Store, Summary, User};

use sources::LetterboxdScraper;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info};

pub type Result<T> = std::result::Result<T, ProcessorError>;

#[derive(Debug, Default, PartialEq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
}

pub struct Processor {
    config: Config,
    output: PathBuf,
    enricher: Option<Enricher>,
    store: Store,
}

impl Processor {
    /// Loads the store at the output path and, when poster fetching is on, sets up the scraper.
    pub fn new(config: Config, options: RunOptions) -> Result<Processor> {
        let enricher = if options.fetch_posters {
            let scraper = LetterboxdScraper::new(&config.posters)?;
            Some(Enricher::new(Box::new(scraper), config.posters.limit))
        } else {
            None
        };

        Ok(Self::with_enricher(config, options, enricher))
    }

    pub fn with_enricher(
        config: Config,
        options: RunOptions,
        enricher: Option<Enricher>,
    ) -> Processor {
        let store = Store::load(&options.output);

        Processor {
            config,
            output: options.output,
            enricher,
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn summary(&self) -> Summary {
        self.store.summary()
    }

    /// Merges one archive into the store and writes the store out. Returns the username used.
    /// Nothing is merged if the archive cannot be read in full.
    pub async fn process_zip(&mut self, path: &Path, username: Option<&str>) -> Result<String> {
        let username = crate::username::resolve(path, username, &self.config.archive.prefix);

        info!(
            "Processing ZIP: {}",
            path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
        );
        info!("Username: {}", username);

        let export = Archive::open(path)?.read_export()?;

        let stats = Merge::merge_user(&mut self.store, &username, export);
        info!("  Movies processed: {} new", stats.movies_added);

        if let Some(enricher) = &self.enricher {
            enricher.fill_missing_posters(&mut self.store).await;
        }

        self.store.save(&self.output)?;

        info!("User '{}' processed successfully", username);

        Ok(username)
    }

    /// Processes every `*.zip` directly inside `dir`, in file name order. A failing archive is
    /// logged and skipped.
    pub async fn process_batch(&mut self, dir: &Path) -> Result<BatchReport> {
        let archives = Self::find_archives(dir)?;

        info!("Found {} ZIP files", archives.len());

        let mut report = BatchReport::default();

        for archive in archives {
            match self.process_zip(&archive, None).await {
                Ok(_) => report.processed += 1,
                Err(err) => {
                    error!("{}", err);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    pub fn find_archives(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(ProcessorError::NotADirectory(dir.to_path_buf()));
        }

        let mut archives = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "zip") {
                archives.push(path);
            }
        }

        if archives.is_empty() {
            return Err(ProcessorError::NoArchives(dir.to_path_buf()));
        }

        archives.sort();

        Ok(archives)
    }
}
