//! # mysql-errnum CLI
//!
//! Look up MySQL server error codes and classify driver messages against the
//! compiled-in error table, or against another error document via `--table`.

use chrono::NaiveDateTime;
use clap::{ArgAction, Parser, Subcommand};
use mysql_errnum::config::{OutputFormat, OutputPreferences};
use mysql_errnum::{from_string, CodeEntry, CodeTable, SourceError};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "mysql-errnum", version, about = "MySQL server error code lookup")]
pub struct Cli {
    /// Output format (text or json), overrides MYSQL_ERRNUM_OUTPUT_FORMAT
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Error document to use instead of the compiled-in table
    #[arg(long, global = true, value_name = "PATH")]
    pub table: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a numeric server error code
    Number {
        #[arg(allow_negative_numbers = true)]
        number: i32,
    },

    /// Look up a MY- prefixed error code
    String { code: String },

    /// Classify a driver message such as "Error 1216: ..."
    Classify {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// List documented codes in document order
    List {
        /// List the MY- prefixed codes instead of numeric ones
        #[arg(long)]
        strings: bool,
    },

    /// Show where the error table came from
    Info,
}

/// Whether the looked-up code resolved to a documented entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Known,
    Unknown,
}

impl Outcome {
    fn of(entry: &CodeEntry) -> Self {
        if entry.is_unknown() {
            Outcome::Unknown
        } else {
            Outcome::Known
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Known => 0,
            Outcome::Unknown => 2,
        }
    }
}

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read error document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Table(#[from] SourceError),

    #[error("Failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Write(#[from] io::Error),
}

/// Single lookup result; `requested` survives when `entry` is the sentinel
#[derive(Debug, Serialize)]
struct Lookup<'a> {
    requested: &'a str,
    #[serde(flatten)]
    entry: &'a CodeEntry,
}

/// Provenance summary printed by `info`
#[derive(Debug, Serialize)]
struct TableInfo<'a> {
    url: &'a str,
    server_version: &'a str,
    generated_at: Option<NaiveDateTime>,
    number_codes: usize,
    string_codes: usize,
}

/// Load an error document from disk
pub fn load_table(path: &Path) -> Result<CodeTable, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = CodeTable::from_toml_str(&content)?;
    log::info!("Using error document {} ({} entries)", path.display(), table.len());
    Ok(table)
}

/// Execute one command against the selected table, writing results to `out`
pub fn run<W: Write>(
    cli: &Cli,
    preferences: &OutputPreferences,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let loaded;
    let table = match &cli.table {
        Some(path) => {
            loaded = load_table(path)?;
            &loaded
        }
        None => CodeTable::global(),
    };

    match &cli.command {
        Command::Number { number } => {
            let entry = table.lookup_number(*number);
            render_entry(out, preferences, &number.to_string(), entry)?;
            Ok(Outcome::of(entry))
        }
        Command::String { code } => {
            let entry = table.lookup_string(code.trim());
            render_entry(out, preferences, code.trim(), entry)?;
            Ok(Outcome::of(entry))
        }
        Command::Classify { message } => {
            let message = message.join(" ");
            let code = from_string(&message);
            log::debug!("Message classified as number {}", code.number());

            let entry = table.lookup_number(code.number());
            render_entry(out, preferences, &code.number().to_string(), entry)?;
            Ok(Outcome::of(entry))
        }
        Command::List { strings } => {
            let entries: Vec<&CodeEntry> = if *strings {
                table.strings().collect()
            } else {
                table.numbers().collect()
            };
            render_list(out, preferences, &entries)?;
            Ok(Outcome::Known)
        }
        Command::Info => {
            render_info(out, preferences, table)?;
            Ok(Outcome::Known)
        }
    }
}

fn render_entry<W: Write>(
    out: &mut W,
    preferences: &OutputPreferences,
    requested: &str,
    entry: &CodeEntry,
) -> Result<(), CliError> {
    match preferences.format {
        OutputFormat::Json => {
            let lookup = Lookup { requested, entry };
            serde_json::to_writer_pretty(&mut *out, &lookup)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let label = if entry.is_unknown() {
                requested.to_string()
            } else {
                entry.code.to_string()
            };
            write!(out, "{} {}", label, entry.symbol)?;
            if preferences.include_sql_state {
                if let Some(sql_state) = &entry.sql_state {
                    write!(out, " (SQLSTATE {})", sql_state)?;
                }
            }
            writeln!(out)?;

            if !entry.message.is_empty() {
                writeln!(out, "  Message: {}", entry.message)?;
            }
            if !entry.description.is_empty() || preferences.show_empty_descriptions {
                writeln!(out, "  {}", entry.description)?;
            }
        }
    }
    Ok(())
}

fn render_list<W: Write>(
    out: &mut W,
    preferences: &OutputPreferences,
    entries: &[&CodeEntry],
) -> Result<(), CliError> {
    match preferences.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, entries)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for entry in entries {
                writeln!(out, "{:<10} {}", entry.code.to_string(), entry.symbol)?;
            }
        }
    }
    Ok(())
}

fn render_info<W: Write>(
    out: &mut W,
    preferences: &OutputPreferences,
    table: &CodeTable,
) -> Result<(), CliError> {
    let source = table.source_info();
    let info = TableInfo {
        url: &source.url,
        server_version: &source.server_version,
        generated_at: table.generated_at(),
        number_codes: table.numbers().count(),
        string_codes: table.strings().count(),
    };

    match preferences.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &info)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Source:         {}", info.url)?;
            writeln!(out, "Server version: {}", info.server_version)?;
            match info.generated_at {
                Some(generated_at) => writeln!(out, "Generated at:   {}", generated_at)?,
                None => writeln!(out, "Generated at:   unknown")?,
            }
            writeln!(out, "Number codes:   {}", info.number_codes)?;
            writeln!(out, "String codes:   {}", info.string_codes)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn text() -> OutputPreferences {
        OutputPreferences {
            format: OutputFormat::Text,
            show_empty_descriptions: false,
            include_sql_state: true,
        }
    }

    fn json() -> OutputPreferences {
        OutputPreferences {
            format: OutputFormat::Json,
            ..text()
        }
    }

    fn run_args(args: &[&str], preferences: &OutputPreferences) -> (Outcome, String) {
        let cli = Cli::try_parse_from(std::iter::once("mysql-errnum").chain(args.iter().copied()))
            .expect("arguments should parse");
        let mut out = Vec::new();
        let outcome = run(&cli, preferences, &mut out).expect("command should succeed");
        (outcome, String::from_utf8(out).expect("output should be UTF-8"))
    }

    #[test]
    fn test_number_lookup_text() {
        let (outcome, output) = run_args(&["number", "1216"], &text());

        assert_eq!(outcome, Outcome::Known);
        assert!(output.starts_with("1216 ER_NO_REFERENCED_ROW (SQLSTATE 23000)\n"));
        assert!(output.contains("  Message: Cannot add or update a child row"));
        assert!(output.contains("Add the parent row first."));
    }

    #[test]
    fn test_unknown_number_exits_with_unknown() {
        let (outcome, output) = run_args(&["number", "64999"], &text());

        assert_eq!(outcome, Outcome::Unknown);
        assert_eq!(outcome.exit_code(), 2);
        assert!(output.starts_with("64999 ER_UNKNOWN_MYSQL_ERROR\n"));
        assert!(output.contains("Unknown MySQL error"));
    }

    #[test]
    fn test_negative_number_is_sentinel() {
        let (outcome, output) = run_args(&["number", "-1"], &text());
        assert_eq!(outcome, Outcome::Unknown);
        assert!(output.contains("ER_UNKNOWN_MYSQL_ERROR"));
    }

    #[test]
    fn test_string_lookup_json() {
        let (outcome, output) = run_args(&["string", "MY-010000"], &json());
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(outcome, Outcome::Known);
        assert_eq!(value["code"], "MY-010000");
        assert_eq!(value["symbol"], "ER_PARSER_TRACE");
        assert_eq!(value["description"], "ER_PARSER_TRACE was added in 8.0.2.");
    }

    #[test]
    fn test_unknown_number_json_keeps_requested_code() {
        let (outcome, output) = run_args(&["number", "64999"], &json());
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(outcome, Outcome::Unknown);
        assert_eq!(value["requested"], "64999");
        assert_eq!(value["code"], -1);
        assert_eq!(value["symbol"], "ER_UNKNOWN_MYSQL_ERROR");
    }

    #[test]
    fn test_classify_joins_message_words() {
        let (outcome, output) = run_args(
            &["classify", "Error", "1062:", "Duplicate", "entry"],
            &text(),
        );

        assert_eq!(outcome, Outcome::Known);
        assert!(output.starts_with("1062 ER_DUP_ENTRY"));
    }

    #[test]
    fn test_classify_without_code() {
        let (outcome, _) = run_args(&["classify", "connection reset by peer"], &text());
        assert_eq!(outcome, Outcome::Unknown);
    }

    #[test]
    fn test_list_numbers_skips_sentinel() {
        let (outcome, output) = run_args(&["list"], &text());

        assert_eq!(outcome, Outcome::Known);
        assert!(output.lines().next().is_some_and(|line| line.starts_with("1000")));
        assert!(!output.contains("ER_UNKNOWN_MYSQL_ERROR"));
        assert!(!output.contains("MY-010000"));
    }

    #[test]
    fn test_list_strings_json() {
        let (_, output) = run_args(&["list", "--strings"], &json());
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        let entries = value.as_array().expect("array output");

        assert!(!entries.is_empty());
        assert!(entries.iter().all(|entry| entry["code"].as_str().is_some()));
    }

    #[test]
    fn test_info_reports_provenance() {
        let (_, output) = run_args(&["info", "--format", "json"], &json());
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(value["server_version"], "8.0");
        assert!(value["generated_at"].is_string());
        assert!(value["number_codes"].as_u64().is_some_and(|count| count > 0));
    }

    #[test]
    fn test_alternate_table() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"
[source]
url = "https://dev.mysql.com/doc/refman/5.7/en/server-error-reference.html"
server_version = "5.7"

[[error]]
code = "1216"
symbol = "ER_NO_REFERENCED_ROW"
sql_state = "23000"
message = "Cannot add or update a child row: a foreign key constraint fails"

[[error]]
code = "1216"
symbol = "ER_SHADOWED"
"#
        )
        .expect("write table");

        let path = file.path().to_str().expect("UTF-8 path");
        let (outcome, output) = run_args(&["--table", path, "number", "1216"], &text());
        assert_eq!(outcome, Outcome::Known);
        assert!(output.starts_with("1216 ER_NO_REFERENCED_ROW"));
        assert!(!output.contains("ER_SHADOWED"));

        let (outcome, _) = run_args(&["--table", path, "number", "1002"], &text());
        assert_eq!(outcome, Outcome::Unknown);

        let (_, output) = run_args(&["--table", path, "info"], &text());
        assert!(output.contains("Server version: 5.7"));
        assert!(output.contains("Generated at:   unknown"));
    }

    #[test]
    fn test_missing_table_is_io_error() {
        let cli = Cli::try_parse_from(["mysql-errnum", "--table", "/nonexistent/errors.toml", "info"])
            .expect("arguments should parse");
        let result = run(&cli, &text(), &mut Vec::new());
        assert!(matches!(result, Err(CliError::Io { .. })));
    }

    #[test]
    fn test_invalid_table_is_table_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "[[error]]\ncode = \"-1\"\nsymbol = \"ER_UNKNOWN_MYSQL_ERROR\"\n")
            .expect("write table");

        let path = file.path().to_str().expect("UTF-8 path");
        let cli = Cli::try_parse_from(["mysql-errnum", "--table", path, "info"])
            .expect("arguments should parse");
        let result = run(&cli, &text(), &mut Vec::new());
        assert!(matches!(
            result,
            Err(CliError::Table(SourceError::SentinelRedefined { .. }))
        ));
    }

    #[test]
    fn test_sql_state_can_be_hidden() {
        let preferences = OutputPreferences {
            include_sql_state: false,
            ..text()
        };
        let (_, output) = run_args(&["number", "1213"], &preferences);
        assert!(output.starts_with("1213 ER_LOCK_DEADLOCK\n"));
    }
}
