use std::fmt::{self, Display, Formatter};

use crate::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    /// Evaluated for its side effects, the value is dropped.
    Expression(Expr<'a>),
    Print(Expr<'a>),
}

impl Display for Stmt<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "(; {})", expr),
            Stmt::Print(expr) => write!(f, "(print {})", expr),
        }
    }
}
