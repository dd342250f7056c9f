use std::{fmt::Formatter, str::Chars};

/// 1-based source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Line(pub usize);

/// Walks the characters of a source buffer, keeping track of the current line.
///
/// Cloning a cursor is cheap, which is how the scanner remembers where the
/// current lexeme started.
#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
}

impl<'a> std::fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The whole source is usually too verbose, so only print it on {:#?}
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .finish()
        }
    }
}

impl<'a> PartialEq for Cursor<'a> {
    fn eq(&self, other: &Self) -> bool {
        (self.source, self.chars.as_str()) == (other.source, other.chars.as_str())
    }
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Byte offset into the source.
    pub fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    pub fn is_at_end(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    /// Consumes the next character only if it is `expected`.
    pub fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes characters as long as `pred` holds. The first character that
    /// doesn't match is left in place.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.next();
        }
    }

    pub fn slice_until(&self, end: &Cursor<'a>) -> &'a str {
        assert!(self.source == end.source);
        &self.source[self.offset()..end.offset()]
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line.0 += 1;
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slice_until() {
        let mut cursor: Cursor = "ab\ncd\n\n".into();

        cursor.next(); // 'a'

        let start = cursor.clone();

        cursor.next(); // 'b'
        cursor.next(); // '\n'
        cursor.next(); // 'c'

        assert_eq!(start.slice_until(&cursor), "b\nc");
    }

    #[test]
    fn lookahead_and_lines() {
        let mut cursor = Cursor::new("ab\ncd\n\n");

        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.next(), Some('a'));
        assert_eq!(cursor.line(), Line(1));

        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.peek(), Some('\n'));
        assert_eq!(cursor.line(), Line(1));

        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(2));

        cursor.next(); // 'c'
        cursor.next(); // 'd'
        cursor.next(); // '\n'
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(4));

        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(4));
    }

    #[test]
    fn advance_if_and_eat_while() {
        let mut cursor = Cursor::new("==123.5x");

        assert!(cursor.advance_if('='));
        assert!(cursor.advance_if('='));
        assert!(!cursor.advance_if('='));

        let start = cursor.clone();
        cursor.eat_while(|c| c.is_ascii_digit());
        assert_eq!(start.slice_until(&cursor), "123");
        assert_eq!(cursor.peek(), Some('.'));
        assert_eq!(cursor.peek_next(), Some('5'));
    }

    #[test]
    fn multibyte_characters() {
        let mut cursor = Cursor::new("äö\n€");
        let start = cursor.clone();
        cursor.next();
        cursor.next();
        assert_eq!(start.slice_until(&cursor), "äö");
        assert_eq!(cursor.offset(), 4);
        cursor.next();
        assert_eq!(cursor.line(), Line(2));
        assert_eq!(cursor.peek(), Some('€'));
    }
}
