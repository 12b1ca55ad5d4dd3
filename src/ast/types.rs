//! Type and argument nodes.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::token::Token;
use crate::errors::AidlError;

/// Direction of a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
        }
    }

    /// Numeric code used by generated stubs.
    pub fn code(self) -> u32 {
        match self {
            Direction::In => 1,
            Direction::Out => 2,
            Direction::InOut => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a direction keyword. Matching is exact and case-sensitive.
///
/// The error carries no line; callers holding the token pin it with
/// [`AidlError::at_line`].
pub fn convert_direction(keyword: &str) -> Result<Direction, AidlError> {
    match keyword {
        "in" => Ok(Direction::In),
        "out" => Ok(Direction::Out),
        "inout" => Ok(Direction::InOut),
        other => Err(AidlError::InvalidDirection {
            direction: other.to_string(),
            line: None,
        }),
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// A return or parameter type, e.g. `String`, `int[][]` or `List<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Token,
    pub array_marker: Option<Token>,
    pub dimension: u32,
}

impl TypeSpec {
    pub fn new(name: Token) -> Self {
        Self {
            name,
            array_marker: None,
            dimension: 0,
        }
    }

    /// Records a matched `[]` pair. The first marker token seen is kept.
    pub fn add_array_dimension(&mut self, marker: Token) {
        self.dimension += 1;
        if self.array_marker.is_none() {
            self.array_marker = Some(marker);
        }
    }

    pub fn is_array(&self) -> bool {
        self.dimension > 0
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.text())?;
        for _ in 0..self.dimension {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// The `,` before this argument; `None` for the first one.
    pub separator: Option<Token>,
    /// The direction keyword as written, `None` when it was omitted.
    pub direction_token: Option<Token>,
    pub direction: Direction,
    pub ty: TypeSpec,
    pub name: Token,
}

impl Argument {
    pub fn new(ty: TypeSpec, name: Token) -> Self {
        Self {
            separator: None,
            direction_token: None,
            direction: Direction::In,
            ty,
            name,
        }
    }

    pub fn with_direction(mut self, token: Token, direction: Direction) -> Self {
        self.direction_token = Some(token);
        self.direction = direction;
        self
    }

    pub fn with_separator(mut self, separator: Token) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn name(&self) -> &str {
        self.name.text()
    }
}

/// Parameters of one method in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentList(Vec<Argument>);

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends at the tail. The head of the list never carries a separator.
    pub fn push(&mut self, mut arg: Argument) {
        if self.0.is_empty() {
            arg.separator = None;
        }
        self.0.push(arg);
    }
}

impl Deref for ArgumentList {
    type Target = [Argument];

    fn deref(&self) -> &[Argument] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Argument> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        let mut list = ArgumentList::new();
        for arg in iter {
            list.push(arg);
        }
        list
    }
}
