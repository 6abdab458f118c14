//! Configuration module for mysql_errnum
//! Build-time selection of the error document and runtime output preferences

pub mod runtime;

pub use runtime::{LogLevel, LoggingPreferences, OutputFormat, OutputPreferences};

/// Build information and error document metadata
pub mod build_info {
    use crate::codes::CodeTable;

    /// Returns the server version whose error document was compiled in
    pub fn server_version() -> &'static str {
        env!("MYSQL_ERRNUM_RESOLVED_VERSION")
    }

    /// Returns the data directory used during build
    pub fn data_dir() -> &'static str {
        env!("MYSQL_ERRNUM_RESOLVED_DATA_DIR")
    }

    /// Returns error document source information
    pub fn source_info() -> String {
        format!(
            "Generated from {}/server-errors-{}.toml ({})",
            data_dir(),
            server_version(),
            CodeTable::global().source_info().url
        )
    }

    /// Returns the OUT_DIR path used for generation (for debugging)
    pub fn out_dir() -> &'static str {
        env!("OUT_DIR")
    }
}
