//! AST module for aidl documents
//!
//! This module provides the document tree produced by the grammar engine:
//! tokens with their trivia, types and arguments, interface members and
//! top-level declarations. Nodes are built in one pass and are immutable
//! afterwards, except for method ids filled in by [`numbering`].

pub mod items;
pub mod numbering;
pub mod token;
pub mod types;

pub use items::{
    interfaces, user_data, DocumentItem, Interface, InterfaceItem, InterfaceLead, Method,
    MethodLead, PackageDecl, UserData,
};
pub use numbering::{assign_document_ids, assign_method_ids, MAX_METHOD_ID};
pub use token::{Token, TokenKind, Trivia, TriviaKind};
pub use types::{convert_direction, Argument, ArgumentList, Direction, TypeSpec};
