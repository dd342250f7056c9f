use std::fmt::Display;

use cursor::Line;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub lexeme: &'a str,
    pub line: Line,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, lexeme: &'a str, line: Line) -> Token<'a> {
        Self { data, lexeme, line }
    }

    pub fn kind(&self) -> TokenKind {
        TokenKind::from(&self.data)
    }

    pub fn lexeme(&self) -> &'a str {
        self.lexeme
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// The decoded value of string, number and identifier tokens.
    pub fn literal(&self) -> Option<Literal<'a>> {
        match self.data {
            TokenData::Str(s) => Some(Literal::Str(s)),
            TokenData::Number(n) => Some(Literal::Number(n)),
            TokenData::Identifier(name) => Some(Literal::Identifier(name)),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.data == TokenData::Eof
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Str(&'a str),
    Number(f64),
    Identifier(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(TokenKind), derive(Hash, strum::Display))]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier(&'a str),
    Str(&'a str),
    Number(f64),

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

static KEYWORDS: phf::Map<&'static str, TokenData<'static>> = phf::phf_map! {
    "and" => TokenData::And,
    "class" => TokenData::Class,
    "else" => TokenData::Else,
    "false" => TokenData::False,
    "for" => TokenData::For,
    "fun" => TokenData::Fun,
    "if" => TokenData::If,
    "nil" => TokenData::Nil,
    "or" => TokenData::Or,
    "print" => TokenData::Print,
    "return" => TokenData::Return,
    "super" => TokenData::Super,
    "this" => TokenData::This,
    "true" => TokenData::True,
    "var" => TokenData::Var,
    "while" => TokenData::While,
};

/// Looks up a reserved word.
pub fn keyword(text: &str) -> Option<TokenData<'static>> {
    KEYWORDS.get(text).copied()
}
