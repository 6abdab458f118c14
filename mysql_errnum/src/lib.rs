//! MySQL server error numbers, generated from the server error reference.
//!
//! ```
//! use mysql_errnum::{from_error, numbers, MySqlError};
//!
//! let err = MySqlError::new(1216, "Cannot add or update a child row");
//! let code = from_error(Some(&err));
//!
//! assert_eq!(code, numbers::ER_NO_REFERENCED_ROW);
//! assert_eq!(code.name(), "ER_NO_REFERENCED_ROW");
//! ```

// Internal modules
pub mod classify;
pub mod codes;
pub mod config;
pub mod driver;

// Re-export key types for library consumers
pub use classify::{from_error, from_error_or_string, from_error_string, from_number, from_string};
pub use codes::{numbers, strings, CodeEntry, CodeKey, CodeTable, ErrorNumber, ErrorString, SourceError};
pub use driver::MySqlError;
