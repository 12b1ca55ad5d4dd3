//! Syntax module for aidl sources
//!
//! The grammar engine ([`parser`]) turns source text into document items and
//! raw import statements; [`import`] classifies the latter. Trivia recovery
//! lives in a private helper module.

pub mod import;
pub mod parser;
mod trivia;

pub use import::{parse_import_statement, ImportKind, ImportStatement};
pub use parser::{parse_document, ParseContext, ParserCallbacks};
