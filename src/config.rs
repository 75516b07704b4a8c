use crate::{ProcessorError, Result};

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            path: PathBuf::from("web/data.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub prefix: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            prefix: "letterboxd-".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostersConfig {
    pub limit: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for PostersConfig {
    fn default() -> Self {
        PostersConfig {
            limit: 10,
            timeout_secs: 5,
            user_agent: format!("letterboxd-merge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub archive: ArchiveConfig,
    pub posters: PostersConfig,
}

impl Config {
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Config> {
        let filename = filename.as_ref();
        let config = fs::read_to_string(filename).map_err(|err| ProcessorError::Config {
            path: filename.to_path_buf(),
            message: err.to_string(),
        })?;

        Self::parse(filename, &config)
    }

    fn parse(filename: &Path, config: &str) -> Result<Config> {
        toml::from_str(config).map_err(|err| ProcessorError::Config {
            path: filename.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Reads an explicitly requested file, or the default location when it exists.
    pub fn load(filename: Option<&Path>) -> Result<Config> {
        match filename {
            Some(filename) => Self::from_file(filename),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file() {
        let config = Config::from_file("config/config.toml").unwrap();
        assert_eq!(config.output.path, PathBuf::from("web/data.json"));
        assert_eq!(config.archive.prefix, "letterboxd-");
        assert_eq!(config.posters.limit, 10);
        assert_eq!(config.posters.timeout_secs, 5);
    }

    #[test]
    fn test_from_file_failure() {
        let err = Config::from_file("should_fail.toml").unwrap_err();
        assert!(matches!(err, ProcessorError::Config { .. }));
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(Path::new("inline.toml"), "[posters]\nlimit = 3\n").unwrap();
        assert_eq!(config.posters.limit, 3);
        assert_eq!(config.posters.timeout_secs, 5);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::parse(Path::new("inline.toml"), "[posters]\nlimit = \"ten\"\n")
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not read config inline.toml"));
    }

    #[test]
    fn test_load() {
        assert_eq!(
            Config::load(None).unwrap(),
            Config::from_file(DEFAULT_CONFIG_PATH).unwrap()
        );
        assert!(Config::load(Some(Path::new("should_fail.toml"))).is_err());
    }

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.output.path, PathBuf::from("web/data.json"));
        assert_eq!(config.posters.limit, 10);
    }
}
