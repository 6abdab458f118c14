//! Classification of arbitrary errors into server error codes.
//!
//! [`from_error`] only trusts structured driver errors. [`from_string`] only
//! looks at text. [`from_error_or_string`] is the one place where the two are
//! combined, structured first.
//!
//! The error arguments take `Option<&(dyn Error + 'static)>`, the same type
//! `Error::source()` returns, so a missing error classifies as unknown instead
//! of needing a separate code path.

use crate::codes::{ErrorNumber, ErrorString};
use crate::driver::MySqlError;
use regex::Regex;
use std::error::Error;
use std::io;
use std::sync::OnceLock;

/// `Error <digits>:` as written by drivers when a server error is rendered
const ERROR_NUMBER_PATTERN: &str = r"Error ([0-9]+):";

static ERROR_NUMBER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn error_number_regex() -> Option<&'static Regex> {
    ERROR_NUMBER_REGEX
        .get_or_init(|| match Regex::new(ERROR_NUMBER_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::error!("Error number pattern failed to compile: {}", e);
                None
            }
        })
        .as_ref()
}

/// Code for a raw server error number
pub fn from_number(number: i32) -> ErrorNumber {
    ErrorNumber::new(number)
}

/// Code of the first [`MySqlError`] in the error's source chain.
///
/// Text is never parsed here: a plain error reading `Error 1216: ...` is
/// unknown. Use [`from_error_or_string`] for that.
pub fn from_error(err: Option<&(dyn Error + 'static)>) -> ErrorNumber {
    match err.and_then(find_structured_number) {
        Some(number) => {
            log::trace!("Classified structured error as {}", number);
            ErrorNumber::from(number)
        }
        None => ErrorNumber::UNKNOWN,
    }
}

/// Code from the first `Error <digits>:` in free text
pub fn from_string(message: &str) -> ErrorNumber {
    let Some(regex) = error_number_regex() else {
        return ErrorNumber::UNKNOWN;
    };

    regex
        .captures(message)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<i32>().ok())
        .map(ErrorNumber::new)
        .unwrap_or(ErrorNumber::UNKNOWN)
}

/// [`from_error`], falling back to [`from_string`] on the error's display text
pub fn from_error_or_string(err: Option<&(dyn Error + 'static)>) -> ErrorNumber {
    let Some(err) = err else {
        return ErrorNumber::UNKNOWN;
    };

    let structured = from_error(Some(err));
    if !structured.is_unknown() {
        return structured;
    }

    let parsed = from_string(&err.to_string());
    if !parsed.is_unknown() {
        log::debug!("Classified error from message text as {}", parsed.number());
    }
    parsed
}

/// Code for a `MY-` prefixed string, [`ErrorString::UNKNOWN`] if undocumented
pub fn from_error_string(code: &str) -> ErrorString {
    ErrorString::resolve(code)
}

/// Walk `source()` links until a driver error turns up.
///
/// `io::Error::source()` skips over a custom payload, so payloads are
/// searched explicitly.
fn find_structured_number(err: &(dyn Error + 'static)) -> Option<u16> {
    std::iter::successors(Some(err), |&current| current.source()).find_map(|current| {
        if let Some(mysql) = current.downcast_ref::<MySqlError>() {
            return Some(mysql.number);
        }

        let payload = current.downcast_ref::<io::Error>()?.get_ref()?;
        find_structured_number(payload)
    })
}
