use crate::config::Config;

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub output: PathBuf,
    pub fetch_posters: bool,
}

impl RunOptions {
    pub fn new(config: &Config, output: Option<PathBuf>, fetch_posters: bool) -> RunOptions {
        RunOptions {
            output: output.unwrap_or_else(|| config.output.path.clone()),
            fetch_posters,
        }
    }
}
