//! Error document schema shared by `build.rs` and runtime table loading.
//!
//! An error document is what the offline scraper writes out after walking the
//! server error reference: a `[source]` table describing where the entries came
//! from and an `[[error]]` array in the order the reference lists them.
//!
//! This file is compiled twice (once into the build script through `#[path]`,
//! once into the library), so it must only depend on `serde`, `toml` and
//! `thiserror`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Reserved number for errors that could not be classified
pub const UNKNOWN_CODE: i32 = -1;

/// Symbol of the reserved unknown entry
pub const UNKNOWN_SYMBOL: &str = "ER_UNKNOWN_MYSQL_ERROR";

/// Description of the reserved unknown entry
pub const UNKNOWN_DESCRIPTION: &str = "Unknown MySQL error";

/// Error document loading errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Invalid error document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Error document redefines the reserved unknown code (symbol '{symbol}')")]
    SentinelRedefined { symbol: String },
}

/// Where a document's entries were scraped from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub server_version: String,

    /// Scrape timestamp in `%Y-%m-%d %H:%M:%S` form
    #[serde(default)]
    pub generated_at: String,
}

/// A complete error document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub source: SourceInfo,

    #[serde(rename = "error", default)]
    pub errors: Vec<SourceEntry>,
}

/// One documented error as found in the reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceEntry {
    /// `"1216"` for server errors, `"MY-010000"` for the string namespace
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub symbol: String,

    #[serde(default)]
    pub sql_state: Option<String>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub description: String,
}

/// Lookup key of an entry: numeric or `XX-NNNNNN` string code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum CodeKey {
    Number(i32),
    String(String),
}

impl fmt::Display for CodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKey::Number(number) => write!(f, "{}", number),
            CodeKey::String(code) => write!(f, "{}", code),
        }
    }
}

impl SourceEntry {
    /// Key of this entry, `None` for list items without a code.
    ///
    /// Anything that parses as an integer lands in the number namespace,
    /// everything else in the string namespace.
    pub fn key(&self) -> Option<CodeKey> {
        let code = self.code.trim();
        if code.is_empty() {
            return None;
        }

        Some(match code.parse::<i32>() {
            Ok(number) => CodeKey::Number(number),
            Err(_) => CodeKey::String(code.to_string()),
        })
    }

    /// Language-safe identifier derived from the symbol
    pub fn identifier(&self) -> String {
        derive_identifier(&self.symbol)
    }

    /// Copy with whitespace collapsed in every text field
    pub fn normalized(&self) -> Self {
        Self {
            code: self.code.trim().to_string(),
            symbol: self.symbol.trim().to_string(),
            sql_state: self
                .sql_state
                .as_deref()
                .map(str::trim)
                .filter(|state| !state.is_empty())
                .map(str::to_string),
            message: normalize_text(&self.message),
            description: normalize_text(&self.description),
        }
    }

    fn is_sentinel(&self) -> bool {
        self.key() == Some(CodeKey::Number(UNKNOWN_CODE)) || self.symbol.trim() == UNKNOWN_SYMBOL
    }
}

impl SourceDocument {
    /// Parse and validate a TOML error document
    pub fn parse(content: &str) -> Result<Self, SourceError> {
        let document: SourceDocument = toml::from_str(content)?;
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<(), SourceError> {
        if let Some(entry) = self.errors.iter().find(|entry| entry.is_sentinel()) {
            return Err(SourceError::SentinelRedefined {
                symbol: entry.symbol.clone(),
            });
        }
        Ok(())
    }

    /// Entries that survive deduplication, normalized, in document order
    pub fn kept_entries(&self) -> Vec<(CodeKey, SourceEntry)> {
        dedup(self.errors.iter().cloned())
    }
}

/// Sentinel entry present in every table regardless of document contents
pub fn unknown_entry() -> SourceEntry {
    SourceEntry {
        code: UNKNOWN_CODE.to_string(),
        symbol: UNKNOWN_SYMBOL.to_string(),
        sql_state: None,
        message: String::new(),
        description: UNKNOWN_DESCRIPTION.to_string(),
    }
}

/// Drop entries without a code and every repeat of an already seen code.
///
/// The reference reuses some numbers for legacy symbols
/// (`1120 ER_WRONG_OUTER_JOIN` / `1120 ER_WRONG_OUTER_JOIN_UNUSED`); the first
/// occurrence wins.
pub fn dedup<I>(entries: I) -> Vec<(CodeKey, SourceEntry)>
where
    I: IntoIterator<Item = SourceEntry>,
{
    let mut seen = HashSet::new();

    entries
        .into_iter()
        .filter_map(|entry| {
            let key = entry.key()?;
            if !seen.insert(key.clone()) {
                return None;
            }
            Some((key, entry.normalized()))
        })
        .collect()
}

/// Collapse runs of whitespace and line breaks into single spaces
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `ER_NO_REFERENCED_ROW` stays as is; anything outside `[A-Z0-9_]` becomes
/// `_` and a leading digit gets a `_` prefix. Empty symbols give an empty
/// identifier.
pub fn derive_identifier(symbol: &str) -> String {
    let mut identifier: String = symbol
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert(0, '_');
    }

    identifier
}
