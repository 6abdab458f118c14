// build.rs - TOML error document to generated error code constants
use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[allow(dead_code)]
#[path = "src/codes/source.rs"]
mod source;

use source::{CodeKey, SourceDocument, SourceEntry};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/codes/source.rs");
    println!("cargo:rerun-if-env-changed=MYSQL_ERRNUM_SERVER_VERSION");
    println!("cargo:rerun-if-env-changed=MYSQL_ERRNUM_DATA_DIR");

    let server_version =
        env::var("MYSQL_ERRNUM_SERVER_VERSION").unwrap_or_else(|_| "8.0".to_string());
    let data_dir = env::var("MYSQL_ERRNUM_DATA_DIR").unwrap_or_else(|_| "data".to_string());

    // Find workspace root (parent of mysql_errnum directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let document_path = workspace_root
        .join(&data_dir)
        .join(format!("server-errors-{}.toml", server_version));

    println!("cargo:rerun-if-changed={}", document_path.display());

    if !document_path.exists() {
        panic!(
            "Error document not found: {}\nWorkspace root: {}\nLooking for: {}/{}/server-errors-{}.toml",
            document_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            data_dir,
            server_version
        );
    }

    let content = fs::read_to_string(&document_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", document_path.display(), e));

    let document = SourceDocument::parse(&content)
        .unwrap_or_else(|e| panic!("Invalid error document {}: {}", document_path.display(), e));

    validate_document(&document, &server_version);

    println!("cargo:rustc-env=MYSQL_ERRNUM_RESOLVED_VERSION={}", server_version);
    println!("cargo:rustc-env=MYSQL_ERRNUM_RESOLVED_DATA_DIR={}", data_dir);

    generate_codes(&document, &document_path);
}

fn validate_document(document: &SourceDocument, server_version: &str) {
    if document.errors.is_empty() {
        panic!("DOCUMENT: no [[error]] entries found");
    }

    if !document.source.server_version.is_empty() && document.source.server_version != server_version
    {
        panic!(
            "DOCUMENT: server_version '{}' does not match requested version '{}'",
            document.source.server_version, server_version
        );
    }

    for entry in &document.errors {
        if entry.key().is_some() && entry.identifier().is_empty() {
            panic!("DOCUMENT: entry with code '{}' has no symbol", entry.code);
        }
    }
}

fn generate_codes(document: &SourceDocument, document_path: &Path) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("codes.rs");

    let kept = document.kept_entries();
    let dropped = document.errors.len() - kept.len();
    if dropped > 0 {
        println!(
            "cargo:warning=Dropped {} duplicate or code-less entries from {}",
            dropped,
            document_path.display()
        );
    }

    let mut numbers = String::new();
    let mut strings = String::new();
    let mut entries = String::new();
    let mut number_identifiers = HashSet::new();
    let mut string_identifiers = HashSet::new();

    for (key, entry) in &kept {
        let identifier = entry.identifier();
        let doc = doc_line(entry);

        match key {
            CodeKey::Number(number) => {
                if number_identifiers.insert(identifier.clone()) {
                    writeln!(numbers, "    #[doc = {:?}]", doc).unwrap();
                    writeln!(
                        numbers,
                        "    pub const {}: ErrorNumber = ErrorNumber::new({});",
                        identifier, number
                    )
                    .unwrap();
                } else {
                    println!("cargo:warning=Skipping constant for repeated symbol {}", identifier);
                }
            }
            CodeKey::String(code) => {
                if string_identifiers.insert(identifier.clone()) {
                    writeln!(strings, "    #[doc = {:?}]", doc).unwrap();
                    writeln!(
                        strings,
                        "    pub const {}: ErrorString = ErrorString::new({:?});",
                        identifier, code
                    )
                    .unwrap();
                } else {
                    println!("cargo:warning=Skipping constant for repeated symbol {}", identifier);
                }
            }
        }

        writeln!(
            entries,
            "    StaticEntry {{ code: {:?}, symbol: {:?}, sql_state: {:?}, message: {:?}, description: {:?} }},",
            entry.code, entry.symbol, entry.sql_state, entry.message, entry.description
        )
        .unwrap();
    }

    let codes = format!(
        r#"
// Generated error code constants from {path}
// Server version: {version}
// DO NOT EDIT - Generated by build.rs

/// Numeric server error codes, one constant per documented error
pub mod numbers {{
    use super::ErrorNumber;

    #[doc = {unknown_doc:?}]
    pub const {unknown_symbol}: ErrorNumber = ErrorNumber::UNKNOWN;
{numbers}}}

/// `MY-` prefixed error codes
pub mod strings {{
    use super::ErrorString;

{strings}}}

pub(crate) const COMPILED_SOURCE: StaticSource = StaticSource {{
    url: {url:?},
    server_version: {version:?},
    generated_at: {generated_at:?},
}};

pub(crate) const COMPILED_ENTRIES: &[StaticEntry] = &[
{entries}];
"#,
        path = document_path.display(),
        version = document.source.server_version,
        unknown_doc = source::UNKNOWN_DESCRIPTION,
        unknown_symbol = source::UNKNOWN_SYMBOL,
        numbers = numbers,
        strings = strings,
        url = document.source.url,
        generated_at = document.source.generated_at,
        entries = entries,
    );

    fs::write(output_path, codes).unwrap();
}

fn doc_line(entry: &SourceEntry) -> String {
    let text = if entry.description.is_empty() {
        &entry.message
    } else {
        &entry.description
    };
    format!("`{}` {}", entry.code, text)
}
