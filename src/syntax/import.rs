//! Import statement classification.
//!
//! The grammar hands over the whole statement (`import foo.Bar;`). Only the
//! keyword, surrounding whitespace and the terminating `;` are stripped:
//!
//! - `import "dir/IFoo.aidl";` is a local import of `dir/IFoo.aidl`;
//! - `import <foo.Bar>;` and `import foo.Bar;` are system imports of `foo.Bar`.
//!
//! Nothing here touches the file system.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::Token;
use crate::errors::AidlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    Local,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    pub kind: ImportKind,
    pub path: String,
    pub line: u32,
}

impl ImportStatement {
    pub fn from_token(token: &Token) -> Result<Self, AidlError> {
        parse_import_statement(token.text(), token.line())
    }

    pub fn is_local(&self) -> bool {
        self.kind == ImportKind::Local
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ImportKind::Local => write!(f, "\"{}\"", self.path),
            ImportKind::System => f.write_str(&self.path),
        }
    }
}

pub fn parse_import_statement(text: &str, line: u32) -> Result<ImportStatement, AidlError> {
    let malformed = |message: &str| AidlError::Syntax {
        line,
        message: format!("{} in '{}'", message, text.trim()),
    };

    let rest = text
        .trim_start()
        .strip_prefix("import")
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_whitespace()))
        .ok_or_else(|| malformed("expected 'import' keyword"))?;
    let rest = rest.trim();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();

    let (kind, path) = if let Some(quoted) = rest.strip_prefix('"') {
        let path = quoted
            .strip_suffix('"')
            .ok_or_else(|| malformed("unterminated quoted import"))?;
        (ImportKind::Local, path)
    } else if let Some(angled) = rest.strip_prefix('<') {
        let path = angled
            .strip_suffix('>')
            .ok_or_else(|| malformed("unterminated '<' import"))?;
        (ImportKind::System, path)
    } else {
        (ImportKind::System, rest)
    };

    if path.is_empty() || path.contains(|c: char| c.is_whitespace()) {
        return Err(malformed("malformed import path"));
    }

    Ok(ImportStatement {
        kind,
        path: path.to_string(),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_is_a_system_import() {
        let import = parse_import_statement("  import foo.Bar;", 2).unwrap();
        assert_eq!(import.kind, ImportKind::System);
        assert_eq!(import.path, "foo.Bar");
        assert_eq!(import.line, 2);
    }

    #[test]
    fn quoted_path_is_a_local_import() {
        let import = parse_import_statement("import \"sub/IFoo.aidl\" ;", 1).unwrap();
        assert!(import.is_local());
        assert_eq!(import.path, "sub/IFoo.aidl");
    }

    #[test]
    fn angled_path_is_a_system_import() {
        let import = parse_import_statement("import\t<android.os.Bundle>;", 1).unwrap();
        assert_eq!(import.kind, ImportKind::System);
        assert_eq!(import.path, "android.os.Bundle");
    }

    #[test]
    fn display_restores_the_written_form() {
        let local = parse_import_statement("import \"sub/IFoo.aidl\";", 1).unwrap();
        assert_eq!(local.to_string(), "\"sub/IFoo.aidl\"");
        let system = parse_import_statement("import <foo.Bar>;", 1).unwrap();
        assert_eq!(system.to_string(), "foo.Bar");
    }

    #[test]
    fn keyword_must_be_a_whole_word() {
        assert!(parse_import_statement("importfoo.Bar;", 1).is_err());
        assert!(parse_import_statement("include foo.Bar;", 1).is_err());
        assert!(parse_import_statement("import ;", 1).is_err());
        assert!(parse_import_statement("import \"open;", 1).is_err());
    }
}
