use super::source::{self, CodeKey, SourceDocument, SourceEntry, SourceError, SourceInfo};
use super::{ErrorNumber, COMPILED_ENTRIES, COMPILED_SOURCE};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Index of the sentinel entry in every table
const UNKNOWN_INDEX: usize = 0;

/// Timestamp format written by the scraper
const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Entry as emitted into `codes.rs` by the build script
#[derive(Debug, Clone, Copy)]
pub(crate) struct StaticEntry {
    pub code: &'static str,
    pub symbol: &'static str,
    pub sql_state: Option<&'static str>,
    pub message: &'static str,
    pub description: &'static str,
}

impl StaticEntry {
    fn to_source(self) -> SourceEntry {
        SourceEntry {
            code: self.code.to_string(),
            symbol: self.symbol.to_string(),
            sql_state: self.sql_state.map(str::to_string),
            message: self.message.to_string(),
            description: self.description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StaticSource {
    pub url: &'static str,
    pub server_version: &'static str,
    pub generated_at: &'static str,
}

impl StaticSource {
    fn to_info(self) -> SourceInfo {
        SourceInfo {
            url: self.url.to_string(),
            server_version: self.server_version.to_string(),
            generated_at: self.generated_at.to_string(),
        }
    }
}

/// A resolved error code with everything the reference says about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    pub code: CodeKey,
    pub symbol: String,
    pub identifier: String,
    pub sql_state: Option<String>,
    pub message: String,
    pub description: String,
}

impl CodeEntry {
    fn from_source(key: CodeKey, entry: SourceEntry) -> Self {
        let identifier = entry.identifier();
        Self {
            code: key,
            symbol: entry.symbol,
            identifier,
            sql_state: entry.sql_state,
            message: entry.message,
            description: entry.description,
        }
    }

    /// Whether this is the reserved unknown entry
    pub fn is_unknown(&self) -> bool {
        self.code == CodeKey::Number(source::UNKNOWN_CODE)
    }
}

/// Immutable code-to-entry mapping.
///
/// Entries live in one vector in document order with the sentinel at index 0;
/// the two namespaces index into it. Lookups never fail: absent codes resolve
/// to the sentinel.
#[derive(Debug, Clone)]
pub struct CodeTable {
    source: SourceInfo,
    entries: Vec<CodeEntry>,
    numbers: HashMap<i32, usize>,
    strings: HashMap<String, usize>,
}

static GLOBAL_TABLE: OnceLock<CodeTable> = OnceLock::new();

impl CodeTable {
    /// Table built from the compiled-in error document
    pub fn global() -> &'static CodeTable {
        GLOBAL_TABLE.get_or_init(|| {
            let table = CodeTable::from_entries(
                COMPILED_SOURCE.to_info(),
                COMPILED_ENTRIES.iter().map(|entry| entry.to_source()),
            );
            log::debug!(
                "Published compiled error table: {} number codes, {} string codes (server {})",
                table.numbers.len(),
                table.strings.len(),
                table.source.server_version
            );
            table
        })
    }

    /// Build a table from entries in document order.
    ///
    /// The sentinel is always installed first, so an entry reusing its code is
    /// silently dropped like any other repeat. [`CodeTable::from_toml_str`] is
    /// stricter and rejects such a document with
    /// [`SourceError::SentinelRedefined`].
    pub fn from_entries<I>(info: SourceInfo, entries: I) -> Self
    where
        I: IntoIterator<Item = SourceEntry>,
    {
        let kept = source::dedup(std::iter::once(source::unknown_entry()).chain(entries));

        let mut table = Self {
            source: info,
            entries: Vec::with_capacity(kept.len()),
            numbers: HashMap::new(),
            strings: HashMap::new(),
        };

        for (key, entry) in kept {
            let index = table.entries.len();
            if index != UNKNOWN_INDEX {
                match &key {
                    CodeKey::Number(number) => {
                        table.numbers.insert(*number, index);
                    }
                    CodeKey::String(code) => {
                        table.strings.insert(code.clone(), index);
                    }
                }
            }
            table.entries.push(CodeEntry::from_source(key, entry));
        }

        table
    }

    /// Parse an error document in the same format as the compiled-in one
    pub fn from_toml_str(content: &str) -> Result<Self, SourceError> {
        let document = SourceDocument::parse(content)?;
        log::debug!(
            "Loaded error document with {} entries from {}",
            document.errors.len(),
            document.source.url
        );
        Ok(Self::from_entries(document.source, document.errors))
    }

    pub fn source_info(&self) -> &SourceInfo {
        &self.source
    }

    /// When the document behind this table was scraped, if recorded
    pub fn generated_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.source.generated_at, GENERATED_AT_FORMAT).ok()
    }

    /// Number of entries including the sentinel
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds nothing but the sentinel
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn unknown(&self) -> &CodeEntry {
        &self.entries[UNKNOWN_INDEX]
    }

    pub fn get_number(&self, number: i32) -> Option<&CodeEntry> {
        self.numbers.get(&number).map(|&index| &self.entries[index])
    }

    pub fn get_string(&self, code: &str) -> Option<&CodeEntry> {
        self.strings.get(code).map(|&index| &self.entries[index])
    }

    pub fn lookup_number(&self, number: i32) -> &CodeEntry {
        self.get_number(number).unwrap_or_else(|| self.unknown())
    }

    pub fn lookup_string(&self, code: &str) -> &CodeEntry {
        self.get_string(code).unwrap_or_else(|| self.unknown())
    }

    /// All entries in document order, sentinel first
    pub fn entries(&self) -> impl Iterator<Item = &CodeEntry> {
        self.entries.iter()
    }

    /// Number namespace entries in document order
    pub fn numbers(&self) -> impl Iterator<Item = &CodeEntry> {
        self.entries
            .iter()
            .skip(1)
            .filter(|entry| matches!(entry.code, CodeKey::Number(_)))
    }

    /// String namespace entries in document order
    pub fn strings(&self) -> impl Iterator<Item = &CodeEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.code, CodeKey::String(_)))
    }

    /// Symbol of `number` in this table
    pub fn name_of(&self, number: ErrorNumber) -> &str {
        &self.lookup_number(number.number()).symbol
    }

    /// Description of `number` in this table
    pub fn description_of(&self, number: ErrorNumber) -> &str {
        &self.lookup_number(number.number()).description
    }
}
