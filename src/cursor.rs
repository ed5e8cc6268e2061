// Token cursor: the parser's only view of the token stream

use crate::lexer::{Token, TokenKind, Tokens};
use crate::parser::{Expected, SyntaxError};
use crate::string_storage::StringStorage;

/// Saved cursor position for speculative parsing
///
/// Only obtainable from [`TokenCursor::checkpoint`], so a restore can never
/// move the cursor somewhere it has not been.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

pub struct TokenCursor {
    tokens: Tokens,
    current: usize,
}

impl TokenCursor {
    /// The first token is the lookahead immediately; no priming advance needed
    pub fn new(tokens: Tokens) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn current(&self) -> &Token {
        self.tokens.get(self.current)
    }

    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Index of the current token in the stream
    pub fn position(&self) -> usize {
        self.current
    }

    /// Consume the current token and return it; stays put on `Eof`
    pub fn advance(&mut self) -> Token {
        let token = *self.current();
        self.current = (self.current + 1).min(self.tokens.len() - 1);
        token
    }

    /// Consume the current token if it has the given kind
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if !self.at(kind) {
            return Err(self.unexpected(Expected::Token(kind)));
        }
        Ok(self.advance())
    }

    /// Consume an identifier spelled `keyword`
    pub fn expect_keyword(&mut self, keyword: &'static str) -> Result<Token, SyntaxError> {
        if !self.matches_keyword(keyword) {
            return Err(self.unexpected(Expected::Keyword(keyword)));
        }
        Ok(self.advance())
    }

    /// Is the current token an identifier spelled `keyword`? Does not consume.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let token = self.current();
        token.kind == TokenKind::Identifier && token.text(self.strings()) == Some(keyword)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.current)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        log::trace!("rewinding from token {} to {}", self.current, checkpoint.0);
        self.current = checkpoint.0;
    }

    /// Build the error for an unexpected current token
    pub fn unexpected(&self, expected: Expected) -> SyntaxError {
        let token = self.current();
        let found_text = match token.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::String => {
                token.text(self.strings()).map(str::to_string)
            }
            _ => None,
        };

        SyntaxError {
            expected,
            found: token.kind,
            found_text,
            line: token.line,
            column: token.column,
            token_idx: self.current,
        }
    }

    pub fn strings(&self) -> &StringStorage {
        self.tokens.strings()
    }

    pub fn into_strings(self) -> StringStorage {
        self.tokens.into_strings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseLimits;
    use crate::lexer::lex;

    fn cursor(source: &str) -> TokenCursor {
        TokenCursor::new(lex(source, &ParseLimits::default()).unwrap())
    }

    #[test]
    fn test_advance_returns_consumed_token() {
        let mut c = cursor("x = 1");
        let tok = c.advance();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text(c.strings()), Some("x"));
        assert_eq!(c.kind(), TokenKind::Assign);
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut c = cursor("x");
        c.advance();
        assert_eq!(c.advance().kind, TokenKind::Eof);
        assert_eq!(c.advance().kind, TokenKind::Eof);
        assert_eq!(c.kind(), TokenKind::Eof);
    }

    #[test]
    fn test_expect() {
        let mut c = cursor("( x");
        assert!(c.expect(TokenKind::LParen).is_ok());

        let err = c.expect(TokenKind::RParen).unwrap_err();
        assert_eq!(err.expected, Expected::Token(TokenKind::RParen));
        assert_eq!(err.found, TokenKind::Identifier);
        assert_eq!(err.found_text.as_deref(), Some("x"));
        assert_eq!((err.line, err.column), (1, 3));

        // A failed expect consumes nothing
        assert_eq!(c.kind(), TokenKind::Identifier);
    }

    #[test]
    fn test_keywords() {
        let mut c = cursor("to toe");
        assert!(c.matches_keyword("to"));
        assert!(!c.matches_keyword("t"));
        assert!(c.expect_keyword("to").is_ok());

        let err = c.expect_keyword("to").unwrap_err();
        assert_eq!(err.expected, Expected::Keyword("to"));
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut c = cursor("a b c");
        c.advance();
        let saved = c.checkpoint();
        c.advance();
        c.advance();
        assert_eq!(c.kind(), TokenKind::Eof);

        c.restore(saved);
        assert_eq!(c.position(), 1);
        assert!(c.matches_keyword("b"));
    }
}
