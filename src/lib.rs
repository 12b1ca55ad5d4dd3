//! aidl: front end for the Android interface definition language.
//!
//! [`ParseState`] drives the parse of one file and exposes the resulting
//! [`ast`] document; [`syntax`] holds the grammar engine it runs.

pub use crate::errors::{AidlError, ParseDiagnostic};
pub use crate::parse_state::{ParseState, ParseStatus};

pub mod ast;
pub mod cli;
pub mod errors;
pub mod logging;
pub mod parse_state;
pub mod syntax;
