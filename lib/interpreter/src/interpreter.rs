use std::io::{self, Stdout, Write};

use cursor::Line;
use errors::{LoxError, LoxErrors};
use log::{debug, trace};
use parser::{Expr, Stmt};
use scanner::{Token, TokenData};

mod value;
pub use value::Value;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Error: {kind}\n\n\t{line} | {operator}")]
    Operator { kind: RuntimeErrorKind, line: Line, operator: String },
    #[error("Error: Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    fn at(kind: RuntimeErrorKind, operator: &Token) -> Self {
        RuntimeError::Operator { kind, line: operator.line(), operator: operator.lexeme().to_string() }
    }

    pub fn kind(&self) -> Option<RuntimeErrorKind> {
        match self {
            RuntimeError::Operator { kind, .. } => Some(*kind),
            RuntimeError::Output(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// Lexical or syntax errors, nothing was executed.
    #[error(transparent)]
    Compile(#[from] LoxErrors),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<LoxError> for InterpretError {
    fn from(e: LoxError) -> Self {
        Self::Compile(e.into())
    }
}

/// Tree-walking evaluator. `print` statements write to `out`.
#[derive(Debug)]
pub struct Interpreter<W: Write = Stdout> {
    out: W,
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Scans, parses and executes a whole script.
    pub fn run_source(&mut self, source: &str) -> Result<(), InterpretError> {
        let tokens = scanner::scan(source)?;
        let stmts = parser::parse(&tokens)?;
        self.interpret(&stmts)?;
        Ok(())
    }

    /// Runs one line of REPL input. A bare expression is evaluated and its value
    /// returned, anything else is run as statements.
    pub fn run_line(&mut self, line: &str) -> Result<Option<Value>, InterpretError> {
        let tokens = scanner::scan(line)?;
        if let Ok(expr) = parser::parse_expression(&tokens) {
            return Ok(Some(self.evaluate(&expr)?));
        }

        let stmts = parser::parse(&tokens)?;
        self.interpret(&stmts)?;
        Ok(None)
    }

    /// Executes statements in order, stopping at the first runtime error.
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for s in stmts {
            self.execute(s)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        debug!("Executing {}", stmt);
        match stmt {
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                Ok(())
            }
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
        }
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        let value: Value = match expr {
            Expr::Literal(literal) => literal.into(),

            Expr::Grouping(expr) => self.evaluate(expr)?,

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                unary(operator, right)?
            }

            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(operator, left, right)?
            }
        };
        trace!("{} => {:?}", expr, value);
        Ok(value)
    }
}

fn unary(operator: &Token, right: Value) -> Result<Value, RuntimeError> {
    match (&operator.data, right) {
        (TokenData::Minus, Value::Number(n)) => Ok((-n).into()),
        (TokenData::Minus, _) => Err(RuntimeError::at(RuntimeErrorKind::OperandMustBeNumber, operator)),
        (TokenData::Bang, v) => Ok((!v.is_truthy()).into()),
        _ => unreachable!("{operator} is not a unary operator"),
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (&operator.data, left, right) {
        (TokenData::Minus, Value::Number(l), Value::Number(r)) => Ok((l - r).into()),
        // Division by zero yields +Inf, -Inf or NaN
        (TokenData::Slash, Value::Number(l), Value::Number(r)) => Ok((l / r).into()),
        (TokenData::Star, Value::Number(l), Value::Number(r)) => Ok((l * r).into()),
        (TokenData::Plus, Value::Number(l), Value::Number(r)) => Ok((l + r).into()),
        (TokenData::Plus, Value::Str(l), Value::Str(r)) => Ok((l + &r).into()),

        (TokenData::Greater, Value::Number(l), Value::Number(r)) => Ok((l > r).into()),
        (TokenData::GreaterEqual, Value::Number(l), Value::Number(r)) => Ok((l >= r).into()),
        (TokenData::Less, Value::Number(l), Value::Number(r)) => Ok((l < r).into()),
        (TokenData::LessEqual, Value::Number(l), Value::Number(r)) => Ok((l <= r).into()),

        (TokenData::EqualEqual, l, r) => Ok((l == r).into()),
        (TokenData::BangEqual, l, r) => Ok((l != r).into()),

        (TokenData::Plus, _, _) => {
            Err(RuntimeError::at(RuntimeErrorKind::OperandsMustBeNumbersOrStrings, operator))
        }
        (
            TokenData::Minus
            | TokenData::Slash
            | TokenData::Star
            | TokenData::Greater
            | TokenData::GreaterEqual
            | TokenData::Less
            | TokenData::LessEqual,
            _,
            _,
        ) => Err(RuntimeError::at(RuntimeErrorKind::OperandsMustBeNumbers, operator)),

        _ => unreachable!("{operator} is not a binary operator"),
    }
}
