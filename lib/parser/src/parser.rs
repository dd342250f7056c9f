mod expr;
mod stmt;

pub use expr::{Expr, LiteralValue};
pub use stmt::Stmt;

use errors::{LoxError, LoxErrors, Result};
use log::{debug, trace};
use scanner::{Token, TokenData};

use TokenData::*;

#[derive(Debug)]
pub struct ParserError<'a> {
    error: ParserErrorType,
    token: Token<'a>,
}

impl<'a> From<ParserError<'a>> for LoxError {
    fn from(error: ParserError<'a>) -> Self {
        let location = if error.token.is_eof() { "at end" } else { error.token.lexeme() };
        LoxError::new(error.token.line(), location, error.error.to_string())
    }
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { token, error }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParserErrorType {
    MissingRightParen,
    ExpectedExpression,
    ExpectedSemicolonAfterValue,
    ExpectedSemicolonAfterExpression,
    ExpectedEndOfExpression,
    TooDeeplyNested,
}

impl std::fmt::Display for ParserErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ParserErrorType::MissingRightParen => "Expect ')' after expression.",
                ParserErrorType::ExpectedExpression => "Expect expression.",
                ParserErrorType::ExpectedSemicolonAfterValue => "Expect ';' after value.",
                ParserErrorType::ExpectedSemicolonAfterExpression => "Expect ';' after expression.",
                ParserErrorType::ExpectedEndOfExpression => "Expect end of expression.",
                ParserErrorType::TooDeeplyNested => "Expression nested too deeply.",
            }
        )
    }
}

/// Deepest chain of groupings and unary operators a single expression may hold.
pub const MAX_NESTING: usize = 200;

/// Recursive descent parser over an already scanned token sequence.
///
/// Precedence, lowest first: equality, comparison, term, factor, unary, primary.
#[derive(Debug)]
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    current: usize,
    depth: usize,
}

pub fn parse<'a>(tokens: &[Token<'a>]) -> std::result::Result<Vec<Stmt<'a>>, LoxErrors> {
    Parser::new(tokens).parse()
}

pub fn parse_expression<'a>(tokens: &[Token<'a>]) -> Result<Expr<'a>> {
    Parser::new(tokens).parse_expression()
}

impl<'t, 'a> Parser<'t, 'a> {
    /// Panics if `tokens` doesn't end with an `Eof` token, the scanner always appends one.
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        assert!(tokens.last().is_some_and(Token::is_eof), "token sequence must end with Eof");
        Self { tokens, current: 0, depth: 0 }
    }

    /// Parses a single expression spanning the whole token sequence.
    pub fn parse_expression(mut self) -> Result<Expr<'a>> {
        let expr = self.expression()?;
        self.consume_or_error(Eof, ParserErrorType::ExpectedEndOfExpression)?;
        Ok(expr)
    }

    /// Parses a whole program. After a syntax error the parser skips ahead to the
    /// next statement so that all errors of the program are reported at once.
    pub fn parse(mut self) -> std::result::Result<Vec<Stmt<'a>>, LoxErrors> {
        let mut errors = LoxErrors::default();
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => {
                    debug!("Parsed statement {}", stmt);
                    stmts.push(stmt)
                }
                Err(e) => {
                    trace!("Hit error: {:?}, syncing...", e);
                    self.synchronize();
                    errors.push(e)
                }
            }
        }

        if errors.is_empty() {
            Ok(stmts)
        } else {
            Err(errors)
        }
    }

    fn statement(&mut self) -> Result<Stmt<'a>> {
        if self.consume(Print).is_ok() {
            return self.print_statement();
        }

        self.expression_statement()
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolonAfterValue)?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolonAfterExpression)?;

        Ok(Stmt::Expression(value))
    }

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.comparison()?;

        while let BangEqual | EqualEqual = self.peek() {
            let operator = self.advance();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.term()?;

        while let Greater | GreaterEqual | Less | LessEqual = self.peek() {
            let operator = self.advance();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.factor()?;

        while let Plus | Minus = self.peek() {
            let operator = self.advance();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.unary()?;

        while let Star | Slash = self.peek() {
            let operator = self.advance();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    /// Every grouping and unary operator passes through here, so this is where
    /// nesting is bounded.
    fn unary(&mut self) -> Result<Expr<'a>> {
        if self.depth == MAX_NESTING {
            let token = self.peek_token();
            return Err(ParserError::new(ParserErrorType::TooDeeplyNested, token).into());
        }

        self.depth += 1;
        let expr = self.unary_operand();
        self.depth -= 1;
        expr
    }

    fn unary_operand(&mut self) -> Result<Expr<'a>> {
        if let Minus | Bang = self.peek() {
            let operator = self.advance();
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        let token = self.peek_token();
        let value = match token.data {
            False => LiteralValue::Boolean(false),
            True => LiteralValue::Boolean(true),
            Nil => LiteralValue::Nil,
            Number(n) => LiteralValue::Number(n),
            Str(s) => LiteralValue::Str(s),
            LeftParen => {
                self.advance();
                let expr = self.expression()?;

                self.consume_or_error(RightParen, ParserErrorType::MissingRightParen)?;

                return Ok(Expr::grouping(expr));
            }

            // The offending token is left in place, synchronize() skips it.
            _ => return Err(ParserError::new(ParserErrorType::ExpectedExpression, token).into()),
        };

        self.advance();
        Ok(Expr::Literal(value))
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().data == Semicolon {
                return;
            }

            if let Class | Fun | Var | For | If | While | Print | Return = self.peek() {
                return;
            }

            self.advance();
        }
    }
}

// Helpers
impl<'t, 'a> Parser<'t, 'a> {
    fn consume(&mut self, data: TokenData) -> std::result::Result<Token<'a>, Token<'a>> {
        debug_assert!(!matches!(data, Number(_) | Str(_) | Identifier(_)));
        let token = self.peek_token();
        if token.data == data {
            Ok(self.advance())
        } else {
            Err(token)
        }
    }

    fn consume_or_error(&mut self, data: TokenData, error_type: ParserErrorType) -> Result<Token<'a>> {
        self.consume(data).map_err(|token| ParserError::new(error_type, token).into())
    }

    fn peek_token(&self) -> Token<'a> {
        self.tokens[self.current]
    }

    fn peek(&self) -> TokenData<'a> {
        self.peek_token().data
    }

    fn previous(&self) -> Token<'a> {
        self.tokens[self.current.saturating_sub(1)]
    }

    /// Never moves past the final `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek_token();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek_token().is_eof()
    }
}

#[cfg(test)]
mod tests {
    use cursor::Line;
    use pretty_assertions::assert_eq;
    use scanner::scan;

    use super::*;

    fn expression(source: &str) -> Result<String> {
        let tokens = scan(source)?;
        parse_expression(&tokens).map(|expr| expr.to_string())
    }

    fn program(source: &str) -> std::result::Result<Vec<String>, LoxErrors> {
        let tokens = scan(source)?;
        parse(&tokens).map(|stmts| stmts.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn grouping_and_unary() {
        assert_eq!(expression("(-123 - 5) * 10").unwrap(), "(* (group (- (- 123) 5)) 10)");
        assert_eq!(expression("!!true").unwrap(), "(! (! true))");
        assert_eq!(expression("--1").unwrap(), "(- (- 1))");
        assert_eq!(expression("((nil))").unwrap(), "(group (group nil))");
    }

    #[test]
    fn left_associative() {
        assert_eq!(expression("1 - 2 - 3").unwrap(), "(- (- 1 2) 3)");
        assert_eq!(expression("8 / 4 / 2").unwrap(), "(/ (/ 8 4) 2)");
        assert_eq!(expression("1 == 2 != false").unwrap(), "(!= (== 1 2) false)");
    }

    #[test]
    fn precedence() {
        assert_eq!(expression("1 + 2 * 3 == 7").unwrap(), "(== (+ 1 (* 2 3)) 7)");
        assert_eq!(expression("-1 < 2 + 3").unwrap(), "(< (- 1) (+ 2 3))");
        assert_eq!(expression("\"a\" + \"b\" >= 1").unwrap(), "(>= (+ a b) 1)");
    }

    #[test]
    fn operator_tokens_are_kept() {
        let tokens = scan("1 <= 2").unwrap();
        let expr = parse_expression(&tokens).unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                Expr::Literal(LiteralValue::Number(1.0)),
                Token::new(LessEqual, "<=", Line(1)),
                Expr::Literal(LiteralValue::Number(2.0)),
            )
        );
    }

    #[test]
    fn unmatched_paren() {
        assert_eq!(
            expression("(1 + 2").unwrap_err(),
            LoxError::new(Line(1), "at end", ParserErrorType::MissingRightParen.to_string())
        );
        assert_eq!(
            expression("(1 + 2 3)").unwrap_err(),
            LoxError::new(Line(1), "3", "Expect ')' after expression.")
        );
    }

    #[test]
    fn expected_expression() {
        assert_eq!(
            expression("1 +").unwrap_err(),
            LoxError::new(Line(1), "at end", "Expect expression.")
        );
        assert_eq!(expression(")").unwrap_err(), LoxError::new(Line(1), ")", "Expect expression."));
        assert_eq!(
            expression("1 *\n\nfoo").unwrap_err(),
            LoxError::new(Line(3), "foo", "Expect expression.")
        );
        assert_eq!(
            expression("").unwrap_err().to_string(),
            "Error: Expect expression.\n\n\t1 | at end"
        );
    }

    #[test]
    fn trailing_tokens() {
        assert_eq!(
            expression("1 2").unwrap_err(),
            LoxError::new(Line(1), "2", ParserErrorType::ExpectedEndOfExpression.to_string())
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |open: &str, close: &str, depth: usize| {
            format!("{}1{}", open.repeat(depth), close.repeat(depth))
        };

        assert!(expression(&nested("(", ")", MAX_NESTING - 1)).is_ok());
        assert!(expression(&nested("-", "", MAX_NESTING - 1)).is_ok());

        let error = expression(&nested("(", ")", 10_000)).unwrap_err();
        assert_eq!(error, LoxError::new(Line(1), "(", "Expression nested too deeply."));

        let error = expression(&nested("!", "", 10_000)).unwrap_err();
        assert_eq!(error, LoxError::new(Line(1), "!", "Expression nested too deeply."));

        let error = expression(&nested("-(", ")", 5_000)).unwrap_err();
        assert_eq!(error.message, ParserErrorType::TooDeeplyNested.to_string());
    }

    #[test]
    fn parsing_continues_after_nesting_error() {
        let source = format!("print {}1;\nprint );", "(".repeat(10_000));
        let errors = program(&source).unwrap_err();
        assert_eq!(
            errors.iter().map(|e| (e.line, e.message.as_str())).collect::<Vec<_>>(),
            vec![(Line(1), "Expression nested too deeply."), (Line(2), "Expect expression.")]
        );
    }

    #[test]
    fn statements() {
        assert_eq!(
            program("print 1 + 2;\n\"side\" == nil;").unwrap(),
            vec!["(print (+ 1 2))", "(; (== side nil))"]
        );
        assert_eq!(program("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn missing_semicolon() {
        assert_eq!(
            program("print 1").unwrap_err(),
            LoxErrors(vec![LoxError::new(Line(1), "at end", "Expect ';' after value.")])
        );
        assert_eq!(
            program("1 + 2\n").unwrap_err(),
            LoxErrors(vec![LoxError::new(Line(2), "at end", "Expect ';' after expression.")])
        );
    }

    #[test]
    fn synchronize_after_error() {
        assert_eq!(
            program("print (1;\nprint 2;\nprint );\n1 + ;").unwrap_err(),
            LoxErrors(vec![
                LoxError::new(Line(1), ";", "Expect ')' after expression."),
                LoxError::new(Line(3), ")", "Expect expression."),
                LoxError::new(Line(4), ";", "Expect expression."),
            ])
        );
    }

    #[test]
    fn synchronize_stops_before_statement_keyword() {
        assert_eq!(
            program("1 + ) print 2; print 3").unwrap_err(),
            LoxErrors(vec![
                LoxError::new(Line(1), ")", "Expect expression."),
                LoxError::new(Line(1), "at end", "Expect ';' after value."),
            ])
        );
    }

    #[test]
    fn lexical_errors_surface_as_diagnostics() {
        assert_eq!(
            program("print 1;\nprint @;").unwrap_err(),
            LoxErrors(vec![LoxError::new(Line(2), "@", "Unexpected character '@'.")])
        );
    }

    #[test]
    #[should_panic(expected = "token sequence must end with Eof")]
    fn tokens_without_eof() {
        Parser::new(&[]);
    }
}
