use crate::store::Record;
use crate::{ProcessorError, Result};

use serde_json::Value;
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::info;
use zip::{result::ZipError, ZipArchive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Watched,
    Ratings,
    Reviews,
    Watchlist,
    Likes,
}

impl ListKind {
    pub const ALL: [ListKind; 5] = [
        ListKind::Watched,
        ListKind::Ratings,
        ListKind::Reviews,
        ListKind::Watchlist,
        ListKind::Likes,
    ];

    pub fn entry_name(&self) -> &'static str {
        match self {
            ListKind::Watched => "watched.csv",
            ListKind::Ratings => "ratings.csv",
            ListKind::Reviews => "reviews.csv",
            ListKind::Watchlist => "watchlist.csv",
            ListKind::Likes => "likes/films.csv",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ListKind::Watched => "watched",
            ListKind::Ratings => "ratings",
            ListKind::Reviews => "reviews",
            ListKind::Watchlist => "watchlist",
            ListKind::Likes => "likes",
        }
    }
}

/// The five record lists of one export. Absent entries are left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserExport {
    pub watched: Vec<Record>,
    pub ratings: Vec<Record>,
    pub reviews: Vec<Record>,
    pub watchlist: Vec<Record>,
    pub likes: Vec<Record>,
}

impl UserExport {
    pub fn list_mut(&mut self, kind: ListKind) -> &mut Vec<Record> {
        match kind {
            ListKind::Watched => &mut self.watched,
            ListKind::Ratings => &mut self.ratings,
            ListKind::Reviews => &mut self.reviews,
            ListKind::Watchlist => &mut self.watchlist,
            ListKind::Likes => &mut self.likes,
        }
    }
}

pub struct Archive {
    path: PathBuf,
    zip: ZipArchive<File>,
}

impl Archive {
    pub fn open(path: &Path) -> Result<Archive> {
        if !path.exists() {
            return Err(ProcessorError::ArchiveNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let zip = ZipArchive::new(file).map_err(|err| ProcessorError::corrupt_archive(path, err))?;

        Ok(Archive {
            path: path.to_path_buf(),
            zip,
        })
    }

    /// Returns the entry's text, or `None` when the archive has no such entry.
    pub fn read_entry(&mut self, name: &str) -> Result<Option<String>> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(ProcessorError::corrupt_archive(&self.path, err)),
        };

        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;

        Ok(Some(contents))
    }

    pub fn read_export(&mut self) -> Result<UserExport> {
        let mut export = UserExport::default();

        for kind in ListKind::ALL {
            match self.read_entry(kind.entry_name())? {
                Some(contents) => {
                    let records = parse_csv(&contents)?;
                    info!("  {}: {} items", kind.key(), records.len());
                    *export.list_mut(kind) = records;
                }
                None => info!("  {}: not found", kind.key()),
            }
        }

        Ok(export)
    }
}

/// Parses CSV text using its first line as the header. Rows shorter than the header are padded
/// with empty strings; surplus fields are dropped.
pub fn parse_csv(text: &str) -> Result<Vec<Record>> {
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row.get(i).unwrap_or("");
                (header.to_owned(), Value::String(value.to_owned()))
            })
            .collect();
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::field;
    use crate::test::helpers::{write_archive, Fixtures};
    use tempfile::tempdir;

    #[test]
    fn test_parse_csv() {
        let records = parse_csv(
            "Date,Name,Year,Letterboxd URI\n2024-01-02,Inception,2010,https://boxd.it/1skk\n",
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(field(&records[0], "Name"), "Inception");
        assert_eq!(field(&records[0], "Year"), "2010");
        assert_eq!(field(&records[0], "Letterboxd URI"), "https://boxd.it/1skk");
    }

    #[test]
    fn test_parse_csv_quoted_fields() {
        let records = parse_csv("Name,Year\n\"Crouching Tiger, Hidden Dragon\",2000\n").unwrap();
        assert_eq!(field(&records[0], "Name"), "Crouching Tiger, Hidden Dragon");
    }

    #[test]
    fn test_parse_csv_short_rows() {
        let records = parse_csv("Name,Year,Rating\nHeat,1995\nAlien\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(field(&records[0], "Rating"), "");
        assert_eq!(records[0].get("Rating"), Some(&Value::String(String::new())));
        assert_eq!(field(&records[1], "Year"), "");
    }

    #[test]
    fn test_parse_csv_empty() {
        assert!(parse_csv("").unwrap().is_empty());
        assert!(parse_csv("  \n\n").unwrap().is_empty());
        assert!(parse_csv("Name,Year\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_csv_bom() {
        let records = parse_csv("\u{feff}Name,Year\nHeat,1995\n").unwrap();
        assert_eq!(field(&records[0], "Name"), "Heat");
    }

    #[test]
    fn test_read_export() {
        let dir = tempdir().unwrap();
        let fixtures = Fixtures::default();
        let path = write_archive(
            dir.path(),
            "letterboxd-alice-2024-01-15.zip",
            &[
                ("watched.csv", fixtures.watched.as_str()),
                ("ratings.csv", fixtures.ratings.as_str()),
                ("likes/films.csv", fixtures.likes.as_str()),
            ],
        );

        let mut archive = Archive::open(&path).unwrap();
        let export = archive.read_export().unwrap();

        assert_eq!(export.watched.len(), 2);
        assert_eq!(export.ratings.len(), 1);
        assert_eq!(export.likes.len(), 1);
        assert!(export.reviews.is_empty());
        assert!(export.watchlist.is_empty());
    }

    #[test]
    fn test_missing_entry() {
        let dir = tempdir().unwrap();
        let path = write_archive(dir.path(), "empty.zip", &[("profile.csv", "Username\nalice\n")]);

        let mut archive = Archive::open(&path).unwrap();
        assert_eq!(archive.read_entry("watched.csv").unwrap(), None);
        assert_eq!(archive.read_export().unwrap(), UserExport::default());
    }

    #[test]
    fn test_open_not_found() {
        let dir = tempdir().unwrap();
        let err = Archive::open(&dir.path().join("nope.zip")).err().unwrap();
        assert!(matches!(err, ProcessorError::ArchiveNotFound(_)));
    }

    #[test]
    fn test_open_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.zip");
        std::fs::write(&path, "this is not a zip file").unwrap();

        let err = Archive::open(&path).err().unwrap();
        assert!(matches!(err, ProcessorError::CorruptArchive { .. }));
    }
}
