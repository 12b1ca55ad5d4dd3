//! Interface-item and document-item variants.
//!
//! A parsed file is a `Vec<DocumentItem>` in file order. Each interface owns
//! its members as a `Vec<InterfaceItem>` in declaration order.

use serde::{Deserialize, Serialize};

use super::token::{Token, Trivia};
use super::types::{ArgumentList, TypeSpec};

// ============================================================================
// LEADING-COMMENT HANDLES
// ============================================================================

/// Names the token of a method whose trivia holds its documentation comment.
///
/// This is a handle into the owning [`Method`], not a second owner; resolve it
/// with [`Method::leading_comments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodLead {
    Oneway,
    ReturnType,
}

/// Names the token of an interface whose trivia holds its documentation
/// comment. Resolve with [`Interface::leading_comments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceLead {
    Oneway,
    Keyword,
}

// ============================================================================
// INTERFACE ITEMS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub return_type: TypeSpec,
    pub oneway: Option<Token>,
    pub name: Token,
    pub args: ArgumentList,
    pub explicit_id: Option<Token>,
    pub lead: MethodLead,
    /// Filled in by the numbering pass.
    pub assigned_id: Option<u32>,
    // Punctuation is kept for the comments in front of it. The grammar engine
    // always fills `open_paren`, `close_paren` and `semicolon`.
    pub open_paren: Option<Token>,
    pub close_paren: Option<Token>,
    pub equals: Option<Token>,
    pub semicolon: Option<Token>,
}

impl Method {
    pub fn new(return_type: TypeSpec, name: Token) -> Self {
        Self {
            return_type,
            oneway: None,
            name,
            args: ArgumentList::new(),
            explicit_id: None,
            lead: MethodLead::ReturnType,
            assigned_id: None,
            open_paren: None,
            close_paren: None,
            equals: None,
            semicolon: None,
        }
    }

    pub fn set_oneway(&mut self, token: Token) {
        self.oneway = Some(token);
        self.lead = MethodLead::Oneway;
    }

    pub fn name(&self) -> &str {
        self.name.text()
    }

    pub fn is_oneway(&self) -> bool {
        self.oneway.is_some()
    }

    pub fn has_explicit_id(&self) -> bool {
        self.explicit_id.is_some()
    }

    pub fn leading_comments(&self) -> &[Trivia] {
        match (self.lead, &self.oneway) {
            (MethodLead::Oneway, Some(token)) => token.trivia(),
            _ => self.return_type.name.trivia(),
        }
    }
}

/// A member declared inside an interface block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
#[non_exhaustive]
pub enum InterfaceItem {
    Method(Method),
}

impl InterfaceItem {
    pub fn name(&self) -> &str {
        match self {
            InterfaceItem::Method(method) => method.name(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            InterfaceItem::Method(method) => method.name.line(),
        }
    }
}

// ============================================================================
// DOCUMENT ITEMS
// ============================================================================

/// The `package` statement. The controller keeps it so that comments ahead
/// of it (a license header, typically) survive the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDecl {
    pub keyword: Token,
    pub name: Token,
    pub semicolon: Token,
}

impl PackageDecl {
    pub fn name(&self) -> &str {
        self.name.text()
    }

    pub fn leading_comments(&self) -> &[Trivia] {
        self.keyword.trivia()
    }
}

/// A forward-declared parcelable type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub keyword: Token,
    pub package: Option<String>,
    pub name: Token,
    pub parcelable: bool,
    pub semicolon: Token,
}

impl UserData {
    pub fn name(&self) -> &str {
        self.name.text()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub keyword: Token,
    pub oneway: Option<Token>,
    pub package: Option<String>,
    pub name: Token,
    pub items: Vec<InterfaceItem>,
    pub lead: InterfaceLead,
    pub open_brace: Option<Token>,
    /// Trivia before the closing brace holds comments after the last member.
    pub close_brace: Option<Token>,
}

impl Interface {
    pub fn new(keyword: Token, name: Token, package: Option<String>) -> Self {
        Self {
            keyword,
            oneway: None,
            package,
            name,
            items: Vec::new(),
            lead: InterfaceLead::Keyword,
            open_brace: None,
            close_brace: None,
        }
    }

    pub fn set_oneway(&mut self, token: Token) {
        self.oneway = Some(token);
        self.lead = InterfaceLead::Oneway;
    }

    pub fn name(&self) -> &str {
        self.name.text()
    }

    pub fn is_oneway(&self) -> bool {
        self.oneway.is_some()
    }

    /// `package.Name`, or just the name outside any package.
    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, self.name()),
            None => self.name().to_string(),
        }
    }

    pub fn leading_comments(&self) -> &[Trivia] {
        match (self.lead, &self.oneway) {
            (InterfaceLead::Oneway, Some(token)) => token.trivia(),
            _ => self.keyword.trivia(),
        }
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.items.iter().map(|item| match item {
            InterfaceItem::Method(method) => method,
        })
    }

    pub fn methods_mut(&mut self) -> impl Iterator<Item = &mut Method> {
        self.items.iter_mut().map(|item| match item {
            InterfaceItem::Method(method) => method,
        })
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
#[non_exhaustive]
pub enum DocumentItem {
    UserData(UserData),
    Interface(Interface),
}

impl DocumentItem {
    pub fn name(&self) -> &str {
        match self {
            DocumentItem::UserData(data) => data.name(),
            DocumentItem::Interface(iface) => iface.name(),
        }
    }

    pub fn package(&self) -> Option<&str> {
        match self {
            DocumentItem::UserData(data) => data.package.as_deref(),
            DocumentItem::Interface(iface) => iface.package.as_deref(),
        }
    }

    pub fn as_interface(&self) -> Option<&Interface> {
        match self {
            DocumentItem::Interface(iface) => Some(iface),
            DocumentItem::UserData(_) => None,
        }
    }
}

pub fn interfaces(items: &[DocumentItem]) -> impl Iterator<Item = &Interface> {
    items.iter().filter_map(DocumentItem::as_interface)
}

pub fn user_data(items: &[DocumentItem]) -> impl Iterator<Item = &UserData> {
    items.iter().filter_map(|item| match item {
        DocumentItem::UserData(data) => Some(data),
        DocumentItem::Interface(_) => None,
    })
}
