//! aidl grammar engine
//!
//! Runs the pest grammar over one source file and builds the document tree
//! bottom-up. Completed fragments are handed to a [`ParserCallbacks`]
//! implementation by value; the engine keeps nothing after a callback
//! returns. Recoverable problems are reported through the same callbacks and
//! parsing continues to the end of the input.

use pest::error::{Error, LineColLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::{debug, trace};

use super::trivia::{scan_trivia, LineIndex};
use crate::ast::{
    convert_direction, Argument, DocumentItem, Interface, InterfaceItem, Method, PackageDecl,
    Token, TokenKind, TypeSpec, UserData,
};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct AidlGrammar;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Receiver of everything the engine produces.
pub trait ParserCallbacks {
    /// The completed top-level declarations, in file order.
    fn document(&mut self, items: Vec<DocumentItem>);

    /// The `package` statement, with the trivia in front of each token.
    fn package(&mut self, decl: PackageDecl);

    /// A raw import statement, keyword and `;` included.
    fn import(&mut self, statement: Token);

    /// A recoverable problem at the given line.
    fn error(&mut self, line: Option<u32>, message: String);
}

/// State threaded through one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Package stamped on every declaration. Seeded by the caller and
    /// replaced by a `package` statement.
    pub package: Option<String>,
}

impl ParseContext {
    pub fn new(package: Option<String>) -> Self {
        Self { package }
    }
}

/// Parses `source`, returning `0` when the whole input was consumed and `1`
/// when the engine had to give up.
pub fn parse_document(
    source: &str,
    context: &mut ParseContext,
    callbacks: &mut dyn ParserCallbacks,
) -> i32 {
    let document = match AidlGrammar::parse(Rule::document, source) {
        Ok(mut pairs) => pairs.next(),
        Err(err) => {
            let (line, message) = describe_pest_error(&err);
            callbacks.error(Some(line), message);
            return 1;
        }
    };
    let Some(document) = document else {
        callbacks.error(None, "empty parse result".to_string());
        return 1;
    };

    let mut builder = TreeBuilder {
        source,
        lines: LineIndex::new(source),
        cursor: 0,
        context,
        callbacks,
    };
    builder.document(document);
    0
}

// ============================================================================
// TREE BUILDER
// ============================================================================

struct TreeBuilder<'s, 'c> {
    source: &'s str,
    lines: LineIndex,
    // End of the last token handed out; trivia is scanned from here.
    cursor: usize,
    context: &'c mut ParseContext,
    callbacks: &'c mut dyn ParserCallbacks,
}

impl TreeBuilder<'_, '_> {
    fn document(&mut self, document: Pair<Rule>) {
        let mut items = Vec::new();

        for pair in document.into_inner() {
            match pair.as_rule() {
                Rule::package_decl => self.package(pair),
                Rule::import_decl => {
                    let statement = self.token(&pair, TokenKind::Import);
                    trace!(line = statement.line(), "import");
                    self.callbacks.import(statement);
                }
                Rule::parcelable_decl => {
                    if let Some(item) = self.parcelable(pair) {
                        items.push(item);
                    }
                }
                Rule::interface_decl => {
                    if let Some(item) = self.interface(pair) {
                        items.push(item);
                    }
                }
                Rule::bad_declaration => self.syntax_error(&pair),
                Rule::EOI => {}
                rule => self.malformed(&pair, rule),
            }
        }

        debug!(items = items.len(), "document complete");
        self.callbacks.document(items);
    }

    fn package(&mut self, pair: Pair<Rule>) {
        let line = pair.line_col().0;
        let mut keyword = None;
        let mut name = None;
        let mut semicolon = None;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::kw_package => keyword = Some(self.token(&part, TokenKind::Package)),
                Rule::qualified_name => name = Some(self.token(&part, TokenKind::Identifier)),
                Rule::semicolon => semicolon = Some(self.token(&part, TokenKind::Semicolon)),
                rule => self.malformed(&part, rule),
            }
        }

        let (Some(keyword), Some(name), Some(semicolon)) = (keyword, name, semicolon) else {
            self.incomplete(line, "package statement");
            return;
        };
        debug!(package = name.text(), "package declared");
        self.context.package = Some(name.text().to_string());
        self.callbacks.package(PackageDecl {
            keyword,
            name,
            semicolon,
        });
    }

    fn parcelable(&mut self, pair: Pair<Rule>) -> Option<DocumentItem> {
        let line = pair.line_col().0;
        let mut keyword = None;
        let mut name = None;
        let mut semicolon = None;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::kw_parcelable => keyword = Some(self.token(&part, TokenKind::Parcelable)),
                Rule::qualified_name => name = Some(self.token(&part, TokenKind::Identifier)),
                Rule::semicolon => semicolon = Some(self.token(&part, TokenKind::Semicolon)),
                rule => self.malformed(&part, rule),
            }
        }

        let (Some(keyword), Some(name), Some(semicolon)) = (keyword, name, semicolon) else {
            self.incomplete(line, "parcelable declaration");
            return None;
        };
        trace!(name = name.text(), "parcelable");
        Some(DocumentItem::UserData(UserData {
            keyword,
            package: self.context.package.clone(),
            name,
            parcelable: true,
            semicolon,
        }))
    }

    fn interface(&mut self, pair: Pair<Rule>) -> Option<DocumentItem> {
        let line = pair.line_col().0;
        let mut oneway = None;
        let mut keyword = None;
        let mut name = None;
        let mut open_brace = None;
        let mut close_brace = None;
        let mut items = Vec::new();

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::kw_oneway => oneway = Some(self.token(&part, TokenKind::Oneway)),
                Rule::kw_interface => keyword = Some(self.token(&part, TokenKind::Interface)),
                Rule::qualified_name => name = Some(self.token(&part, TokenKind::Identifier)),
                Rule::open_brace => open_brace = Some(self.token(&part, TokenKind::OpenBrace)),
                Rule::close_brace => close_brace = Some(self.token(&part, TokenKind::CloseBrace)),
                Rule::method_decl => {
                    if let Some(method) = self.method(part) {
                        items.push(InterfaceItem::Method(method));
                    }
                }
                Rule::bad_member => self.syntax_error(&part),
                rule => self.malformed(&part, rule),
            }
        }

        let (Some(keyword), Some(name)) = (keyword, name) else {
            self.incomplete(line, "interface declaration");
            return None;
        };
        let mut iface = Interface::new(keyword, name, self.context.package.clone());
        if let Some(token) = oneway {
            iface.set_oneway(token);
        }
        iface.items = items;
        iface.open_brace = open_brace;
        iface.close_brace = close_brace;
        trace!(name = iface.name(), members = iface.items.len(), "interface");
        Some(DocumentItem::Interface(iface))
    }

    fn method(&mut self, pair: Pair<Rule>) -> Option<Method> {
        let line = pair.line_col().0;
        let mut oneway = None;
        let mut return_type = None;
        let mut name = None;
        let mut explicit_id = None;
        let mut args = Vec::new();
        let mut separator = None;
        let mut open_paren = None;
        let mut close_paren = None;
        let mut equals = None;
        let mut semicolon = None;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::kw_oneway => oneway = Some(self.token(&part, TokenKind::Oneway)),
                Rule::type_spec => return_type = self.type_spec(part),
                Rule::identifier => name = Some(self.token(&part, TokenKind::Identifier)),
                Rule::comma => separator = Some(self.token(&part, TokenKind::Comma)),
                Rule::arg => {
                    let separator = separator.take();
                    if let Some(arg) = self.argument(part) {
                        args.push(match separator {
                            Some(token) => arg.with_separator(token),
                            None => arg,
                        });
                    }
                }
                Rule::id_value => explicit_id = Some(self.token(&part, TokenKind::IdValue)),
                Rule::open_paren => open_paren = Some(self.token(&part, TokenKind::OpenParen)),
                Rule::close_paren => close_paren = Some(self.token(&part, TokenKind::CloseParen)),
                Rule::equals => equals = Some(self.token(&part, TokenKind::Equals)),
                Rule::semicolon => semicolon = Some(self.token(&part, TokenKind::Semicolon)),
                rule => self.malformed(&part, rule),
            }
        }

        let (Some(return_type), Some(name)) = (return_type, name) else {
            self.incomplete(line, "method declaration");
            return None;
        };
        let mut method = Method::new(return_type, name);
        if let Some(token) = oneway {
            method.set_oneway(token);
        }
        method.args = args.into_iter().collect();
        method.explicit_id = explicit_id;
        method.open_paren = open_paren;
        method.close_paren = close_paren;
        method.equals = equals;
        method.semicolon = semicolon;
        Some(method)
    }

    fn argument(&mut self, pair: Pair<Rule>) -> Option<Argument> {
        let line = pair.line_col().0;
        let mut direction = None;
        let mut ty = None;
        let mut name = None;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::direction => direction = Some(self.token(&part, TokenKind::Direction)),
                Rule::type_spec => ty = self.type_spec(part),
                Rule::identifier => name = Some(self.token(&part, TokenKind::Identifier)),
                rule => self.malformed(&part, rule),
            }
        }

        let (Some(ty), Some(name)) = (ty, name) else {
            self.incomplete(line, "argument");
            return None;
        };
        let arg = Argument::new(ty, name);
        match direction {
            None => Some(arg),
            Some(token) => match convert_direction(token.text()) {
                Ok(direction) => Some(arg.with_direction(token, direction)),
                Err(err) => {
                    let err = err.at_line(token.line());
                    self.callbacks.error(err.line(), err.to_string());
                    None
                }
            },
        }
    }

    fn type_spec(&mut self, pair: Pair<Rule>) -> Option<TypeSpec> {
        let mut ty: Option<TypeSpec> = None;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::qualified_name => {
                    ty = Some(TypeSpec::new(self.token(&part, TokenKind::Identifier)));
                }
                Rule::generic_type => {
                    ty = Some(TypeSpec::new(self.token(&part, TokenKind::Generic)));
                }
                Rule::array_marker => {
                    let marker = self.token(&part, TokenKind::ArrayMarker);
                    if let Some(ty) = ty.as_mut() {
                        ty.add_array_dimension(marker);
                    }
                }
                rule => self.malformed(&part, rule),
            }
        }
        ty
    }

    // ------------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------------

    fn token(&mut self, pair: &Pair<Rule>, kind: TokenKind) -> Token {
        let span = pair.as_span();
        let line = self.lines.line(span.start());
        let mut token = Token::with_text(line, kind, span.as_str());
        if span.start() >= self.cursor {
            let gap = &self.source[self.cursor..span.start()];
            token.attach_trivia(scan_trivia(gap, self.cursor, &self.lines));
        }
        self.cursor = self.cursor.max(span.end());
        token
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    fn syntax_error(&mut self, pair: &Pair<Rule>) {
        let span = pair.as_span();
        self.cursor = self.cursor.max(span.end());
        let line = self.lines.line(span.start());
        let message = format!("syntax error near '{}'", excerpt(span.as_str()));
        self.callbacks.error(Some(line), message);
    }

    fn malformed(&mut self, pair: &Pair<Rule>, rule: Rule) {
        let line = self.lines.line(pair.as_span().start());
        self.callbacks
            .error(Some(line), format!("unexpected {:?} in parse tree", rule));
    }

    fn incomplete(&mut self, line: usize, construct: &str) {
        self.callbacks
            .error(Some(line as u32), format!("incomplete {}", construct));
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

const EXCERPT_LEN: usize = 40;

// First line of the offending text, shortened for messages.
fn excerpt(text: &str) -> String {
    let first = text.trim().lines().next().unwrap_or("");
    let mut short: String = first.chars().take(EXCERPT_LEN).collect();
    if first.chars().count() > EXCERPT_LEN {
        short.push_str("...");
    }
    short
}

fn describe_pest_error(err: &Error<Rule>) -> (u32, String) {
    let line = match err.line_col {
        LineColLocation::Pos((line, _)) | LineColLocation::Span((line, _), _) => line,
    };
    (line as u32, format!("syntax error: {}", err.variant.message()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collector {
        items: Option<Vec<DocumentItem>>,
        package: Option<PackageDecl>,
        imports: Vec<Token>,
        errors: Vec<(Option<u32>, String)>,
    }

    impl ParserCallbacks for Collector {
        fn document(&mut self, items: Vec<DocumentItem>) {
            self.items = Some(items);
        }

        fn package(&mut self, decl: PackageDecl) {
            self.package = Some(decl);
        }

        fn import(&mut self, statement: Token) {
            self.imports.push(statement);
        }

        fn error(&mut self, line: Option<u32>, message: String) {
            self.errors.push((line, message));
        }
    }

    fn run(source: &str) -> (i32, Collector) {
        let mut collector = Collector::default();
        let code = parse_document(source, &mut ParseContext::default(), &mut collector);
        (code, collector)
    }

    #[test]
    fn empty_input_yields_an_empty_document() {
        let (code, collector) = run("");
        assert_eq!(code, 0);
        assert_eq!(collector.items, Some(vec![]));
        assert!(collector.errors.is_empty());
    }

    #[test]
    fn package_is_stamped_on_declarations() {
        let mut collector = Collector::default();
        let mut context = ParseContext::new(Some("seed".into()));
        parse_document(
            "package com.example;\nparcelable Foo;",
            &mut context,
            &mut collector,
        );
        assert_eq!(context.package.as_deref(), Some("com.example"));
        let items = collector.items.unwrap();
        assert_eq!(items[0].package(), Some("com.example"));
    }

    #[test]
    fn seeded_package_applies_without_a_statement() {
        let mut collector = Collector::default();
        let mut context = ParseContext::new(Some("seed.pkg".into()));
        parse_document("parcelable Foo;", &mut context, &mut collector);
        assert_eq!(collector.items.unwrap()[0].package(), Some("seed.pkg"));
    }

    #[test]
    fn imports_are_forwarded_verbatim() {
        let (_, collector) = run("import foo.Bar;\nimport \"x/IBaz.aidl\";\n");
        let texts: Vec<_> = collector.imports.iter().map(Token::text).collect();
        assert_eq!(texts, vec!["import foo.Bar;", "import \"x/IBaz.aidl\";"]);
        assert_eq!(collector.imports[1].line(), 2);
    }

    #[test]
    fn generic_and_array_types() {
        let (_, collector) = run("interface I { Map<String, List<int>>[][] get(in int[] a); }");
        let items = collector.items.unwrap();
        let DocumentItem::Interface(iface) = &items[0] else {
            panic!("expected interface");
        };
        let method = iface.methods().next().unwrap();
        assert_eq!(method.return_type.name.kind(), TokenKind::Generic);
        assert_eq!(method.return_type.name.text(), "Map<String, List<int>>");
        assert_eq!(method.return_type.dimension, 2);
        assert_eq!(method.args[0].ty.dimension, 1);
    }

    #[test]
    fn bad_members_are_reported_and_skipped() {
        let (code, collector) = run("interface I {\n void a(;\n void b();\n}");
        assert_eq!(code, 0);
        assert_eq!(collector.errors.len(), 1);
        assert_eq!(collector.errors[0].0, Some(2));
        let items = collector.items.unwrap();
        let names: Vec<_> = items[0]
            .as_interface()
            .unwrap()
            .methods()
            .map(Method::name)
            .collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn unconsumable_input_gives_up() {
        let (code, collector) = run("parcelable Foo; trailing garbage");
        assert_eq!(code, 1);
        assert!(collector.items.is_none());
        assert_eq!(collector.errors.len(), 1);
    }

    fn comments(token: Option<&Token>) -> Vec<&str> {
        token
            .map(|t| t.comments().map(|c| c.text.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn comments_before_punctuation_are_kept() {
        let source = "// license\npackage a.b /* pkg */;\ninterface I {\n  \
                      void f(int x /* arg doc */) /* eq */ = 1 /* after id */;\n  \
                      /* tail */\n}\nparcelable P /* semi */;";
        let (code, collector) = run(source);
        assert_eq!(code, 0);
        assert!(collector.errors.is_empty());

        let package = collector.package.unwrap();
        assert_eq!(package.name(), "a.b");
        assert_eq!(package.leading_comments()[0].text, "// license");
        assert_eq!(comments(Some(&package.semicolon)), vec!["/* pkg */"]);

        let items = collector.items.unwrap();
        let iface = items[0].as_interface().unwrap();
        let method = iface.methods().next().unwrap();
        assert_eq!(method.open_paren.as_ref().map(Token::kind), Some(TokenKind::OpenParen));
        assert_eq!(comments(method.close_paren.as_ref()), vec!["/* arg doc */"]);
        assert_eq!(comments(method.equals.as_ref()), vec!["/* eq */"]);
        assert_eq!(comments(method.semicolon.as_ref()), vec!["/* after id */"]);
        assert_eq!(comments(iface.close_brace.as_ref()), vec!["/* tail */"]);
        assert_eq!(iface.close_brace.as_ref().map(Token::line), Some(6));

        let DocumentItem::UserData(parcel) = &items[1] else {
            panic!("expected parcelable");
        };
        assert_eq!(comments(Some(&parcel.semicolon)), vec!["/* semi */"]);
    }

    #[test]
    fn direction_keyword_is_not_a_type() {
        let (code, collector) = run("interface I {\n  void f(in x);\n  void g(out in y);\n}");
        assert_eq!(code, 0);
        let lines: Vec<_> = collector.errors.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![Some(2), Some(3)]);
        let items = collector.items.unwrap();
        assert_eq!(items[0].as_interface().unwrap().methods().count(), 0);
    }

    #[test]
    fn invalid_direction_points_at_its_line() {
        let (_, collector) = run("interface I {\n  void f(\n    bogus int x);\n}");
        assert_eq!(collector.errors.len(), 1);
        assert_eq!(collector.errors[0].0, Some(3));
        assert!(collector.errors[0].1.contains("'bogus'"));
    }

    #[test]
    fn excerpt_is_shortened() {
        assert_eq!(excerpt("  void a(;\nmore"), "void a(;");
        let long = "x".repeat(60);
        assert_eq!(excerpt(&long).len(), EXCERPT_LEN + 3);
    }
}
