use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use itertools::Itertools;

use cursor::Line;

/// A diagnostic pointing at a line of the source, shared by the scanner and the parser.
///
/// `location` is the offending source text, or `at end` when the problem is
/// the end of the input.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("Error: {message}\n\n\t{line} | {location}")]
pub struct LoxError {
    pub line: Line,
    pub location: String,
    pub message: String,
}

impl LoxError {
    pub fn new(line: Line, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self { line, location: location.into(), message: message.into() }
    }
}

#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

pub type Result<T> = std::result::Result<T, LoxError>;
