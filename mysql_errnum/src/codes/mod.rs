//! MySQL server error codes and the table they are resolved against.
//!
//! Constants in [`numbers`] and [`strings`] are generated by `build.rs` from
//! the error document selected at build time (see [`crate::config::build_info`]).
//! Resolving a code to its symbol or description goes through
//! [`CodeTable::global`], which is built from the same compiled-in entries the
//! first time it is needed.

mod number;
pub mod source;
mod table;

pub use number::{ErrorNumber, ErrorString};
pub use source::{CodeKey, SourceError, SourceInfo};
pub use table::{CodeEntry, CodeTable};

use table::{StaticEntry, StaticSource};

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/codes.rs"));
