//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use ouroboros_params::filetype::mime_type;
use ouroboros_params::{
    FileHeader, FileProvider, FormFile, ProviderError, ReadSeek, SourceMap, Values,
};

pub const BLACK_PIXEL: &[u8] = include_bytes!("../testdata/black_pixel.png");
pub const BLACK_PIXEL_BMP: &[u8] = include_bytes!("../testdata/black_pixel.bmp");
pub const INVALID_CONTENT: &[u8] = include_bytes!("../testdata/invalid_content.png");
pub const INVALID_MAGIC: &[u8] = include_bytes!("../testdata/invalid_magic.png");
pub const NOTES: &[u8] = include_bytes!("../testdata/notes.txt");
pub const EMPTY: &[u8] = include_bytes!("../testdata/empty.bin");

pub const VALID_UUID: &str = "1aa75114-6117-4908-b6ea-0d22ecdd4fc0";

/// Route library logs to the test output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Build a source map from `(source, key, value)` triples
pub fn sources(entries: &[(&str, &str, &str)]) -> SourceMap {
    let mut sources = SourceMap::new();
    for (source, key, value) in entries {
        sources
            .entry(source.to_string())
            .or_insert_with(Values::new)
            .add(*key, *value);
    }
    sources
}

/// Source map with the given empty sources
pub fn empty_sources(names: &[&str]) -> SourceMap {
    names
        .iter()
        .map(|name| (name.to_string(), Values::new()))
        .collect()
}

/// An upload as a handler would build it, with its sniffed mime type
pub fn form_file(filename: &str, content: &[u8]) -> FormFile {
    let mut file = Cursor::new(content.to_vec());
    let mime = mime_type(&mut file).unwrap();
    FormFile {
        file: Box::new(file),
        header: FileHeader::new(filename, content.len() as u64),
        mime,
    }
}

// ============================================================================
// File provider
// ============================================================================

/// In-memory uploads, keyed by field name
#[derive(Default)]
pub struct MemoryProvider {
    files: HashMap<String, (Vec<u8>, FileHeader)>,
    failing: HashSet<String>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` under `name`
    pub fn with_file(mut self, name: &str, filename: &str, content: &[u8]) -> Self {
        let header = FileHeader::new(filename, content.len() as u64);
        self.files.insert(name.to_string(), (content.to_vec(), header));
        self
    }

    /// Fail with an unexpected error when `name` is requested
    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl FileProvider for MemoryProvider {
    fn form_file(&self, name: &str) -> Result<(Box<dyn ReadSeek + Send>, FileHeader), ProviderError> {
        if self.failing.contains(name) {
            return Err(ProviderError::Other("unexpected error".into()));
        }
        match self.files.get(name) {
            Some((content, header)) => {
                let file: Box<dyn ReadSeek + Send> = Box::new(Cursor::new(content.clone()));
                Ok((file, header.clone()))
            }
            None => Err(ProviderError::MissingFile),
        }
    }
}

// ============================================================================
// Parseable type
// ============================================================================

/// Calendar date in `YYYY-MM-DD` form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidDate;

impl fmt::Display for InvalidDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid date format")
    }
}

impl FromStr for Date {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(InvalidDate);
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(InvalidDate);
        }

        let date = Date {
            year: year.parse().map_err(|_| InvalidDate)?,
            month: month.parse().map_err(|_| InvalidDate)?,
            day: day.parse().map_err(|_| InvalidDate)?,
        };
        if !(1..=12).contains(&date.month) || !(1..=31).contains(&date.day) {
            return Err(InvalidDate);
        }
        Ok(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

ouroboros_params::parseable!(Date);
