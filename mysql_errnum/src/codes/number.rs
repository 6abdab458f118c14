use super::source::UNKNOWN_CODE;
use super::{CodeEntry, CodeKey, CodeTable};
use std::fmt;

/// Numeric MySQL server error code, as carried by driver errors.
///
/// The raw number is kept even when the compiled table has no entry for it;
/// [`name`](Self::name) and [`description`](Self::description) resolve such
/// numbers to the unknown entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorNumber(i32);

impl ErrorNumber {
    /// Reserved code for errors that could not be classified
    pub const UNKNOWN: ErrorNumber = ErrorNumber(UNKNOWN_CODE);

    pub const fn new(number: i32) -> Self {
        Self(number)
    }

    pub const fn number(self) -> i32 {
        self.0
    }

    /// Entry in the compiled table, the unknown entry if absent
    pub fn entry(self) -> &'static CodeEntry {
        CodeTable::global().lookup_number(self.0)
    }

    /// Symbolic name such as `ER_NO_REFERENCED_ROW`
    pub fn name(self) -> &'static str {
        &self.entry().symbol
    }

    pub fn description(self) -> &'static str {
        &self.entry().description
    }

    /// Server message template, e.g. `Duplicate entry '%s' for key %d`
    pub fn message(self) -> &'static str {
        &self.entry().message
    }

    pub fn sql_state(self) -> Option<&'static str> {
        self.entry().sql_state.as_deref()
    }

    pub const fn is_unknown(self) -> bool {
        self.0 == UNKNOWN_CODE
    }

    /// Whether the compiled table documents this number
    pub fn is_known(self) -> bool {
        CodeTable::global().get_number(self.0).is_some()
    }
}

impl Default for ErrorNumber {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl From<i32> for ErrorNumber {
    fn from(number: i32) -> Self {
        Self(number)
    }
}

impl From<u16> for ErrorNumber {
    fn from(number: u16) -> Self {
        Self(i32::from(number))
    }
}

impl fmt::Display for ErrorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `MY-` prefixed error code from the server log namespace.
///
/// Only codes present in the compiled table are representable besides
/// [`ErrorString::UNKNOWN`]; see [`crate::from_error_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorString(&'static str);

impl ErrorString {
    /// Reserved code for strings that could not be classified
    pub const UNKNOWN: ErrorString = ErrorString("");

    /// Used by the generated `strings` constants only
    pub(crate) const fn new(code: &'static str) -> Self {
        Self(code)
    }

    /// Resolve against the compiled table, canonicalizing the code
    pub(crate) fn resolve(code: &str) -> Self {
        match CodeTable::global().get_string(code) {
            Some(CodeEntry {
                code: CodeKey::String(canonical),
                ..
            }) => Self(canonical.as_str()),
            _ => Self::UNKNOWN,
        }
    }

    /// The code itself, e.g. `MY-010000`; empty for the unknown code
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    pub fn entry(self) -> &'static CodeEntry {
        CodeTable::global().lookup_string(self.0)
    }

    pub fn name(self) -> &'static str {
        &self.entry().symbol
    }

    pub fn description(self) -> &'static str {
        &self.entry().description
    }

    pub fn message(self) -> &'static str {
        &self.entry().message
    }

    pub fn sql_state(self) -> Option<&'static str> {
        self.entry().sql_state.as_deref()
    }

    pub fn is_unknown(self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ErrorString {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for ErrorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{numbers, strings};

    #[test]
    fn test_display_uses_symbol() {
        assert_eq!(numbers::ER_NO.to_string(), "ER_NO");
        assert_eq!(ErrorNumber::UNKNOWN.to_string(), "ER_UNKNOWN_MYSQL_ERROR");
        assert_eq!(strings::ER_PARSER_TRACE.to_string(), "ER_PARSER_TRACE");
        assert_eq!(ErrorString::UNKNOWN.to_string(), "ER_UNKNOWN_MYSQL_ERROR");
    }

    #[test]
    fn test_unrecognized_number_keeps_raw_value() {
        let number = ErrorNumber::new(65_000);

        assert_eq!(number.number(), 65_000);
        assert!(!number.is_unknown());
        assert!(!number.is_known());
        assert_eq!(number.name(), "ER_UNKNOWN_MYSQL_ERROR");
        assert_eq!(number.description(), "Unknown MySQL error");
        assert_eq!(number.sql_state(), None);
    }

    #[test]
    fn test_sql_state_and_message() {
        assert_eq!(numbers::ER_NO_REFERENCED_ROW.sql_state(), Some("23000"));
        assert_eq!(
            numbers::ER_NO_REFERENCED_ROW.message(),
            "Cannot add or update a child row: a foreign key constraint fails"
        );
        assert_eq!(numbers::ER_LOCK_DEADLOCK.sql_state(), Some("40001"));
    }

    #[test]
    fn test_unknown_constant_is_sentinel() {
        assert_eq!(numbers::ER_UNKNOWN_MYSQL_ERROR, ErrorNumber::UNKNOWN);
        assert_eq!(ErrorNumber::default(), ErrorNumber::UNKNOWN);
        assert!(ErrorNumber::UNKNOWN.is_unknown());
        assert!(!ErrorNumber::UNKNOWN.is_known());
    }

    #[test]
    fn test_resolve_string_code() {
        assert_eq!(ErrorString::resolve("MY-010054"), strings::ER_SCHEDULER_KILLING);
        assert_eq!(ErrorString::resolve("MY-999999"), ErrorString::UNKNOWN);
        assert!(ErrorString::resolve("").is_unknown());
        assert_eq!(strings::ER_PARSER_TRACE.as_str(), "MY-010000");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(ErrorNumber::from(1216u16), numbers::ER_NO_REFERENCED_ROW);
        assert_eq!(ErrorNumber::from(1002i32), numbers::ER_NO);
    }
}
