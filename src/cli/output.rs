//! Handles all user-facing output for the CLI.
//!
//! Trees and import lists are rendered to strings here so the rendering can
//! be tested without a terminal; the `print_*` functions only write them out.

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::{Argument, DocumentItem, Interface, InterfaceItem, Method};
use crate::syntax::{ImportKind, ImportStatement};

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    file: &'a str,
    package: Option<&'a str>,
    imports: &'a [ImportStatement],
    items: &'a [DocumentItem],
}

pub fn document_to_json(
    file: &str,
    package: Option<&str>,
    imports: &[ImportStatement],
    items: &[DocumentItem],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonDocument {
        file,
        package,
        imports,
        items,
    })
}

pub fn imports_to_json(imports: &[ImportStatement]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(imports)
}

// ============================================================================
// OUTLINE
// ============================================================================

/// One line per declaration, method and import.
pub fn render_outline(
    package: Option<&str>,
    imports: &[ImportStatement],
    items: &[DocumentItem],
) -> String {
    let mut out = String::new();
    if let Some(package) = package {
        let _ = writeln!(out, "package {}", package);
    }
    for import in imports {
        let _ = writeln!(out, "{}", render_import(import));
    }
    for item in items {
        match item {
            DocumentItem::UserData(data) => {
                let _ = writeln!(out, "parcelable {}", data.name());
            }
            DocumentItem::Interface(iface) => render_interface(&mut out, iface),
        }
    }
    out
}

pub fn render_import(import: &ImportStatement) -> String {
    let kind = match import.kind {
        ImportKind::Local => "local",
        ImportKind::System => "system",
    };
    format!("import {} {} (line {})", kind, import.path, import.line)
}

fn render_interface(out: &mut String, iface: &Interface) {
    let oneway = if iface.is_oneway() { "oneway " } else { "" };
    let _ = writeln!(out, "{}interface {}", oneway, iface.qualified_name());
    for item in &iface.items {
        match item {
            InterfaceItem::Method(method) => {
                let _ = writeln!(out, "  {}", render_method(method));
            }
        }
    }
}

fn render_method(method: &Method) -> String {
    let mut line = String::new();
    if let Some(id) = method.assigned_id {
        let _ = write!(line, "[{}] ", id);
    }
    if method.is_oneway() {
        line.push_str("oneway ");
    }
    let args: Vec<String> = method.args.iter().map(render_argument).collect();
    let _ = write!(
        line,
        "{} {}({})",
        method.return_type,
        method.name(),
        args.join(", ")
    );
    if let Some(id) = &method.explicit_id {
        let _ = write!(line, " = {}", id.text());
    }
    line
}

fn render_argument(arg: &Argument) -> String {
    format!("{} {} {}", arg.direction, arg.ty, arg.name())
}

// ============================================================================
// PRINTING
// ============================================================================

pub fn print_outline(outline: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    if print_outline_colored(&mut stdout, outline).is_err() {
        print!("{}", outline);
    }
}

// Top-level lines in bold, members as they are.
fn print_outline_colored(writer: &mut impl WriteColor, outline: &str) -> std::io::Result<()> {
    for line in outline.lines() {
        if line.starts_with(' ') {
            writeln!(writer, "{}", line)?;
            continue;
        }
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(writer, "{}", line)?;
        writer.reset()?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Direction, Token, TokenKind, TypeSpec};

    fn ident(text: &str) -> Token {
        Token::with_text(1, TokenKind::Identifier, text)
    }

    #[test]
    fn outline_lists_members_in_order() {
        let mut iface = Interface::new(
            Token::with_text(1, TokenKind::Interface, "interface"),
            ident("IFoo"),
            Some("com.example".into()),
        );
        let mut method = Method::new(TypeSpec::new(ident("int")), ident("add"));
        let mut array = TypeSpec::new(ident("int"));
        array.add_array_dimension(Token::with_text(1, TokenKind::ArrayMarker, "[]"));
        method.args.push(Argument::new(TypeSpec::new(ident("int")), ident("a")));
        method.args.push(
            Argument::new(array, ident("b"))
                .with_direction(Token::with_text(1, TokenKind::Direction, "out"), Direction::Out),
        );
        method.explicit_id = Some(Token::with_text(1, TokenKind::IdValue, "5"));
        method.assigned_id = Some(5);
        iface.items.push(InterfaceItem::Method(method));

        let imports = vec![ImportStatement {
            kind: ImportKind::System,
            path: "foo.Bar".into(),
            line: 2,
        }];
        let outline = render_outline(
            Some("com.example"),
            &imports,
            &[DocumentItem::Interface(iface)],
        );

        assert_eq!(
            outline,
            "package com.example\n\
             import system foo.Bar (line 2)\n\
             interface com.example.IFoo\n  \
             [5] int add(in int a, out int[] b) = 5\n"
        );
    }
}
