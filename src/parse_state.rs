//! Parse-state controller.
//!
//! A [`ParseState`] owns the parse of exactly one source file:
//!
//! ```text
//! Created -> FileOpened -> Parsing -> Succeeded | Failed
//! ```
//!
//! It feeds the source to the grammar engine, receives the finished document
//! and import statements through [`ParserCallbacks`], and collects every
//! reported problem. Results are readable once [`ParseState::run_parser`] has
//! returned.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::{assign_document_ids, DocumentItem, PackageDecl, Token};
use crate::errors::{AidlError, ParseDiagnostic};
use crate::syntax::{parse_document, ImportStatement, ParseContext, ParserCallbacks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseStatus {
    Created,
    FileOpened,
    Parsing,
    Succeeded,
    Failed,
}

impl ParseStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, ParseStatus::Succeeded | ParseStatus::Failed)
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseStatus::Created => "created",
            ParseStatus::FileOpened => "file-opened",
            ParseStatus::Parsing => "parsing",
            ParseStatus::Succeeded => "succeeded",
            ParseStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct ParseState {
    path: PathBuf,
    filename: String,
    package: Option<String>,
    package_decl: Option<PackageDecl>,
    source: Option<String>,
    status: ParseStatus,
    error_count: usize,
    diagnostics: Vec<ParseDiagnostic>,
    document: Vec<DocumentItem>,
    imports: Vec<ImportStatement>,
}

impl ParseState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            filename: path.display().to_string(),
            path,
            package: None,
            package_decl: None,
            source: None,
            status: ParseStatus::Created,
            error_count: 0,
            diagnostics: Vec::new(),
            document: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Seeds the package stamped on declarations when the file itself has no
    /// `package` statement.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    // ------------------------------------------------------------------------
    // Driving the parse
    // ------------------------------------------------------------------------

    pub fn open_file_from_disk(&mut self) -> Result<(), AidlError> {
        self.require(ParseStatus::Created, "open_file_from_disk")?;
        let text = fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AidlError::FileNotFound {
                path: self.path.clone(),
            },
            _ => AidlError::Io {
                path: self.path.clone(),
                source,
            },
        })?;
        self.load(text);
        Ok(())
    }

    /// Uses in-memory text instead of reading the file.
    pub fn open_from_source(&mut self, text: impl Into<String>) -> Result<(), AidlError> {
        self.require(ParseStatus::Created, "open_from_source")?;
        self.load(text.into());
        Ok(())
    }

    fn load(&mut self, text: String) {
        debug!(file = %self.filename, bytes = text.len(), "source loaded");
        self.source = Some(text);
        self.status = ParseStatus::FileOpened;
    }

    /// Runs the grammar engine to the end of the input and returns its exit
    /// code. Recoverable problems do not stop the run; check
    /// [`found_no_errors`](Self::found_no_errors) for the verdict.
    pub fn run_parser(&mut self) -> Result<i32, AidlError> {
        self.require(ParseStatus::FileOpened, "run_parser")?;
        self.status = ParseStatus::Parsing;
        debug!(file = %self.filename, "parsing");

        let source = self.source.take().unwrap_or_default();
        let mut context = ParseContext::new(self.package.take());
        let code = parse_document(&source, &mut context, self);
        self.package = context.package;
        self.source = Some(source);

        self.status = if code == 0 && self.error_count == 0 {
            ParseStatus::Succeeded
        } else {
            ParseStatus::Failed
        };
        debug!(
            file = %self.filename,
            status = %self.status,
            errors = self.error_count,
            "parse finished"
        );
        Ok(code)
    }

    /// Records a problem against this file. Never fails; callable at any
    /// time, and demotes a finished parse to `Failed`.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.record(None, message.into());
    }

    pub fn report_error_at(&mut self, line: u32, message: impl Into<String>) {
        self.record(Some(line), message.into());
    }

    fn record(&mut self, line: Option<u32>, message: String) {
        warn!(file = %self.filename, line = ?line, "{}", message);
        self.error_count += 1;
        self.diagnostics.push(ParseDiagnostic {
            file: self.filename.clone(),
            line,
            message,
        });
        if self.status == ParseStatus::Succeeded {
            self.status = ParseStatus::Failed;
        }
    }

    /// Takes ownership of the finished document, replacing any earlier one.
    pub fn process_document(&mut self, items: Vec<DocumentItem>) {
        self.document = items;
    }

    /// Classifies a raw import statement and keeps it.
    pub fn process_import(&mut self, statement: Token) {
        match ImportStatement::from_token(&statement) {
            Ok(import) => self.imports.push(import),
            Err(err) => self.record(err.line(), err.to_string()),
        }
    }

    /// Numbers the methods of every interface. Only valid on a successful
    /// parse; stops at the first structural violation.
    pub fn assign_method_ids(&mut self) -> Result<(), AidlError> {
        if !self.found_no_errors() {
            return Err(AidlError::UsagePrecondition {
                operation: "assign_method_ids",
                state: self.status,
            });
        }
        assign_document_ids(&mut self.document)
    }

    // ------------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------------

    pub fn found_no_errors(&self) -> bool {
        self.status == ParseStatus::Succeeded && self.error_count == 0
    }

    pub fn status(&self) -> ParseStatus {
        self.status
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn file_name(&self) -> Result<&str, AidlError> {
        self.require_finished("file_name")?;
        Ok(&self.filename)
    }

    pub fn package(&self) -> Result<Option<&str>, AidlError> {
        self.require_finished("package")?;
        Ok(self.package.as_deref())
    }

    /// The file's own `package` statement, `None` when the package was only
    /// seeded by the caller.
    pub fn package_decl(&self) -> Result<Option<&PackageDecl>, AidlError> {
        self.require_finished("package_decl")?;
        Ok(self.package_decl.as_ref())
    }

    pub fn document(&self) -> Result<&[DocumentItem], AidlError> {
        self.require_finished("document")?;
        Ok(&self.document)
    }

    pub fn imports(&self) -> Result<&[ImportStatement], AidlError> {
        self.require_finished("imports")?;
        Ok(&self.imports)
    }

    /// Releases the document to the caller.
    pub fn take_document(&mut self) -> Result<Vec<DocumentItem>, AidlError> {
        self.require_finished("take_document")?;
        Ok(std::mem::take(&mut self.document))
    }

    fn require(&self, expected: ParseStatus, operation: &'static str) -> Result<(), AidlError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(AidlError::UsagePrecondition {
                operation,
                state: self.status,
            })
        }
    }

    fn require_finished(&self, operation: &'static str) -> Result<(), AidlError> {
        if self.status.is_finished() {
            Ok(())
        } else {
            Err(AidlError::UsagePrecondition {
                operation,
                state: self.status,
            })
        }
    }
}

impl ParserCallbacks for ParseState {
    fn document(&mut self, items: Vec<DocumentItem>) {
        self.process_document(items);
    }

    fn package(&mut self, decl: PackageDecl) {
        self.package_decl = Some(decl);
    }

    fn import(&mut self, statement: Token) {
        self.process_import(statement);
    }

    fn error(&mut self, line: Option<u32>, message: String) {
        self.record(line, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_require_a_finished_parse() {
        let mut state = ParseState::new("IFoo.aidl");
        assert!(matches!(
            state.document(),
            Err(AidlError::UsagePrecondition { state: ParseStatus::Created, .. })
        ));
        state.open_from_source("interface IFoo {}").unwrap();
        assert!(state.file_name().is_err());
        state.run_parser().unwrap();
        assert_eq!(state.file_name().unwrap(), "IFoo.aidl");
    }

    #[test]
    fn steps_must_run_in_order() {
        let mut state = ParseState::new("IFoo.aidl");
        assert!(state.run_parser().is_err());
        state.open_from_source("").unwrap();
        assert!(state.open_from_source("").is_err());
        state.run_parser().unwrap();
        assert!(matches!(
            state.run_parser(),
            Err(AidlError::UsagePrecondition { operation: "run_parser", .. })
        ));
    }

    #[test]
    fn error_before_parsing_fails_the_parse() {
        let mut state = ParseState::new("IFoo.aidl");
        state.report_error("bad invocation");
        state.open_from_source("parcelable Foo;").unwrap();
        assert_eq!(state.run_parser().unwrap(), 0);
        assert_eq!(state.status(), ParseStatus::Failed);
        assert!(!state.found_no_errors());
    }

    #[test]
    fn numbering_refuses_a_failed_parse() {
        let mut state = ParseState::new("IFoo.aidl");
        state.open_from_source("interface I { void a(; }").unwrap();
        state.run_parser().unwrap();
        assert!(matches!(
            state.assign_method_ids(),
            Err(AidlError::UsagePrecondition { state: ParseStatus::Failed, .. })
        ));
    }

    #[test]
    fn positioned_reports_keep_their_line() {
        let mut state = ParseState::new("IFoo.aidl");
        state.open_from_source("parcelable Foo;").unwrap();
        state.run_parser().unwrap();
        state.report_error_at(1, "Foo is never used");
        assert_eq!(state.diagnostics()[0].to_string(), "IFoo.aidl:1: Foo is never used");
        assert_eq!(state.status(), ParseStatus::Failed);
    }

    #[test]
    fn package_statement_is_kept_with_its_comments() {
        let mut state = ParseState::new("IFoo.aidl");
        state.open_from_source("/* license */\npackage a.b;\n").unwrap();
        state.run_parser().unwrap();
        let decl = state.package_decl().unwrap().unwrap();
        assert_eq!(decl.name(), "a.b");
        assert_eq!(decl.leading_comments()[0].text, "/* license */");

        let mut seeded = ParseState::new("IBar.aidl").with_package("seed");
        seeded.open_from_source("").unwrap();
        seeded.run_parser().unwrap();
        assert!(seeded.package_decl().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let mut state = ParseState::new("/definitely/not/here/IFoo.aidl");
        assert!(matches!(
            state.open_file_from_disk(),
            Err(AidlError::FileNotFound { .. })
        ));
        assert_eq!(state.status(), ParseStatus::Created);
    }
}
