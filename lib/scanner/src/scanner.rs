use cursor::Cursor;
use errors::LoxError;
use log::trace;

pub mod token;
pub use token::{keyword, Literal, Token, TokenData, TokenKind};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    /// Guards the `f64` conversion in `number()`. The scanner only accepts
    /// `digits ('.' digits)?`, which `str::parse` always converts, overflowing to infinity.
    #[error("Invalid number literal.")]
    InvalidNumber,
}

/// Turns source text into tokens in a single pass.
///
/// Scanning stops at the first lexical error; no partial token list is handed out.
pub struct Scanner<'a> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
}

pub fn scan(source: &str) -> Result<Vec<Token>, LoxError> {
    Scanner::new(source).scan_tokens()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { start: Cursor::new(source), current: Cursor::new(source), tokens: Vec::new() }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token<'a>>, LoxError> {
        loop {
            self.start = self.current.clone();
            let Some(c) = self.current.next() else {
                break;
            };

            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => {
                    let data = if self.current.advance_if('=') { BangEqual } else { Bang };
                    self.add_token(data)
                }
                '=' => {
                    let data = if self.current.advance_if('=') { EqualEqual } else { Equal };
                    self.add_token(data)
                }
                '<' => {
                    let data = if self.current.advance_if('=') { LessEqual } else { Less };
                    self.add_token(data)
                }
                '>' => {
                    let data = if self.current.advance_if('=') { GreaterEqual } else { Greater };
                    self.add_token(data)
                }

                '/' => {
                    if self.current.advance_if('/') {
                        // Comment, the line feed is left for the next iteration
                        self.current.eat_while(|c| c != '\n');
                    } else {
                        self.add_token(Slash)
                    }
                }

                // The cursor counts line feeds itself.
                ' ' | '\r' | '\t' | '\x0C' | '\n' => (),

                '"' => self.string()?,
                d if d.is_ascii_digit() => self.number()?,
                a if is_alpha(a) => self.identifier(),

                c => return Err(self.error(ScanError::UnexpectedCharacter(c))),
            }
        }

        self.tokens.push(Token::new(Eof, "", self.current.line()));
        Ok(self.tokens)
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.current)
    }

    fn add_token(&mut self, data: TokenData<'a>) {
        let token = Token::new(data, self.lexeme(), self.current.line());
        trace!("Scanned {:?}", token);
        self.tokens.push(token);
    }

    fn error(&self, error: ScanError) -> LoxError {
        match error {
            ScanError::UnexpectedCharacter(c) => {
                LoxError::new(self.current.line(), c.to_string(), error.to_string())
            }
            // Reported where the literal starts, the cursor may be lines further down
            ScanError::UnterminatedString | ScanError::InvalidNumber => {
                LoxError::new(self.start.line(), self.lexeme(), error.to_string())
            }
        }
    }

    fn string(&mut self) -> Result<(), LoxError> {
        self.current.eat_while(|c| c != '"');

        if !self.current.advance_if('"') {
            return Err(self.error(ScanError::UnterminatedString));
        }

        let lexeme = self.lexeme();
        self.add_token(Str(&lexeme[1..lexeme.len() - 1]));
        Ok(())
    }

    fn number(&mut self) -> Result<(), LoxError> {
        self.current.eat_while(|c| c.is_ascii_digit());

        // A trailing dot is not part of the number, e.g. `123.sqrt()`
        if self.current.peek() == Some('.')
            && self.current.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.current.next();
            self.current.eat_while(|c| c.is_ascii_digit());
        }

        // Cannot fail for the digit runs accepted above
        let value =
            self.lexeme().parse::<f64>().map_err(|_| self.error(ScanError::InvalidNumber))?;
        self.add_token(Number(value));
        Ok(())
    }

    fn identifier(&mut self) {
        self.current.eat_while(is_alphanumeric);

        let text = self.lexeme();
        self.add_token(keyword(text).unwrap_or(Identifier(text)));
    }
}
