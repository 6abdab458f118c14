//! Error shape produced by MySQL drivers.
//!
//! Driver adapters return this type (directly or as a `source()` of their own
//! errors) so [`crate::from_error`] can find the server error number.

use crate::codes::ErrorNumber;

/// Error reported by the server over the wire
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error {number}: {message}")]
pub struct MySqlError {
    pub number: u16,
    pub sql_state: Option<String>,
    pub message: String,
}

impl MySqlError {
    pub fn new(number: u16, message: impl Into<String>) -> Self {
        Self {
            number,
            sql_state: None,
            message: message.into(),
        }
    }

    pub fn with_sql_state(mut self, sql_state: impl Into<String>) -> Self {
        self.sql_state = Some(sql_state.into());
        self
    }

    /// Server error number as a table code
    pub fn code(&self) -> ErrorNumber {
        ErrorNumber::from(self.number)
    }
}
