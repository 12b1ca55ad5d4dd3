//! Presentation of accumulated parse diagnostics.
//!
//! `AidlDiagnostic` pairs a [`ParseDiagnostic`] with the source it refers to
//! and renders the offending line with a little context around it.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::ParseDiagnostic;

/// Number of lines of context to show before and after the reported line.
const SNIPPET_CONTEXT_LINES: usize = 1;

pub struct AidlDiagnostic<'a> {
    diagnostic: &'a ParseDiagnostic,
    source: Option<&'a str>,
}

impl<'a> AidlDiagnostic<'a> {
    pub fn new(diagnostic: &'a ParseDiagnostic, source: Option<&'a str>) -> Self {
        Self { diagnostic, source }
    }

    fn snippet(&self) -> Option<String> {
        let line = self.diagnostic.line? as usize;
        generate_code_snippet(self.source?, line)
    }
}

impl Display for AidlDiagnostic<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "{}", header(self.diagnostic))?;
        if let Some(snippet) = self.snippet() {
            write!(f, "{}", snippet)?;
        }
        Ok(())
    }
}

fn header(diagnostic: &ParseDiagnostic) -> String {
    match diagnostic.line {
        Some(line) => format!("{}:{}: error: {}", diagnostic.file, line, diagnostic.message),
        None => format!("{}: error: {}", diagnostic.file, diagnostic.message),
    }
}

/// Numbered source lines around `line` (1-based); the reported line is
/// marked with `>`.
fn generate_code_snippet(source: &str, line: usize) -> Option<String> {
    let lines: Vec<&str> = source.lines().collect();
    if line == 0 || line > lines.len() {
        return None;
    }

    let display_start = line.saturating_sub(SNIPPET_CONTEXT_LINES).max(1);
    let display_end = (line + SNIPPET_CONTEXT_LINES).min(lines.len());
    let width = display_end.to_string().len();

    let mut result = String::new();
    for line_num in display_start..=display_end {
        let marker = if line_num == line { '>' } else { ' ' };
        result.push_str(&format!(
            "{} {:width$} | {}\n",
            marker,
            line_num,
            lines[line_num - 1],
            width = width
        ));
    }
    Some(result)
}

/// Prints every diagnostic to standard error, colored when supported.
pub fn print_diagnostics_to_stderr(diagnostics: &[ParseDiagnostic], source: Option<&str>) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    for diagnostic in diagnostics {
        let diagnostic = AidlDiagnostic::new(diagnostic, source);
        if print_diagnostic_colored(&mut stderr, &diagnostic).is_err() {
            eprint!("{}", diagnostic);
        }
    }
}

fn print_diagnostic_colored(
    writer: &mut impl WriteColor,
    diagnostic: &AidlDiagnostic,
) -> std::io::Result<()> {
    let inner = diagnostic.diagnostic;
    match inner.line {
        Some(line) => write!(writer, "{}:{}: ", inner.file, line)?,
        None => write!(writer, "{}: ", inner.file)?,
    }
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(writer, "error")?;
    writer.reset()?;
    writeln!(writer, ": {}", inner.message)?;

    if let Some(snippet) = diagnostic.snippet() {
        writer.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(writer, "{}", snippet)?;
        writer.reset()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(line: Option<u32>) -> ParseDiagnostic {
        ParseDiagnostic {
            file: "IFoo.aidl".into(),
            line,
            message: "syntax error near 'void a(;'".into(),
        }
    }

    #[test]
    fn renders_reported_line_with_context() {
        let source = "interface IFoo {\n  void a(;\n}\n";
        let diag = diagnostic(Some(2));
        let output = AidlDiagnostic::new(&diag, Some(source)).to_string();

        let expected = "IFoo.aidl:2: error: syntax error near 'void a(;'
  1 | interface IFoo {
> 2 |   void a(;
  3 | }
";
        assert_eq!(output, expected);
    }

    #[test]
    fn renders_header_only_without_line() {
        let diag = diagnostic(None);
        let output = AidlDiagnostic::new(&diag, Some("x")).to_string();
        assert_eq!(output, "IFoo.aidl: error: syntax error near 'void a(;'\n");
    }

    #[test]
    fn out_of_range_line_has_no_snippet() {
        assert!(generate_code_snippet("one line", 5).is_none());
    }
}
