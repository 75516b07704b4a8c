use crate::Result;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::Path,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, warn};

/// One CSV row, keyed by column header in file order.
pub type Record = IndexMap<String, Value>;

/// Returns the string value of a record field, or `""` when absent or not a string.
pub fn field<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Reads any JSON scalar as text so a hand-edited value never invalidates the whole store.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        Value::Null => String::new(),
        value => value.to_string(),
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Null => None,
        value => Some(value.to_string()),
    })
}

pub fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub watched: Vec<Record>,
    #[serde(default)]
    pub ratings: Vec<Record>,
    #[serde(default)]
    pub reviews: Vec<Record>,
    #[serde(default)]
    pub watchlist: Vec<Record>,
    #[serde(default)]
    pub likes: Vec<Record>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `rating` keeps whatever JSON the store held; fresh merges write the CSV text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MovieUser {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub watched: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieUser {
    pub fn rating_str(&self) -> Option<&str> {
        self.rating.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Movie {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub uri: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub poster: Option<String>,
    #[serde(default)]
    pub users: Vec<MovieUser>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    pub fn key(name: &str, year: &str) -> String {
        format!("{}|{}", name, year)
    }

    pub fn from_record(record: &Record) -> Movie {
        Movie {
            name: field(record, "Name").to_owned(),
            year: field(record, "Year").to_owned(),
            uri: field(record, "Letterboxd URI").to_owned(),
            ..Movie::default()
        }
    }

    pub fn has_poster(&self) -> bool {
        matches!(&self.poster, Some(poster) if !poster.is_empty())
    }

    pub fn has_user(&self, username: &str) -> bool {
        self.users.iter().any(|user| user.name == username)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub movies: IndexMap<String, Movie>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub users: usize,
    pub movies: usize,
    pub movies_with_poster: usize,
    pub last_updated: Option<String>,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "LETTERBOXD DATA SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Users loaded: {}", self.users)?;
        writeln!(f, "Total movies: {}", self.movies)?;
        writeln!(f, "Movies with posters: {}", self.movies_with_poster)?;
        if let Some(last_updated) = &self.last_updated {
            writeln!(f, "Last updated: {}", last_updated)?;
        }
        write!(f, "{}", rule)
    }
}

impl Store {
    /// Loads a previously written store. A missing file yields an empty store, as does one that
    /// cannot be read or parsed (with a warning).
    pub fn load(path: &Path) -> Store {
        if !path.exists() {
            return Store::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("Could not read existing {}: {}. Starting fresh.", path.display(), err);
                return Store::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(store) => store,
            Err(err) => {
                warn!("Could not load existing {}: {}. Starting fresh.", path.display(), err);
                Store::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        info!("Data saved to {}", path.display());

        Ok(())
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|user| user.name == name)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            users: self.users.len(),
            movies: self.movies.len(),
            movies_with_poster: self.movies.values().filter(|m| m.has_poster()).count(),
            last_updated: self.last_updated.clone(),
        }
    }
}
