use std::iter::Peekable;
use std::str::CharIndices;

use bitflags::bitflags;

use crate::config::ParseLimits;
use crate::string_storage::{StringId, StringStorage};

// Token types

/// Keywords are not token kinds: they lex as `Identifier` and the parser
/// compares their text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Identifiers and literals
    Identifier,
    Number,
    String,

    // Punctuation
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }
    Comma,    // ,
    Dot,      // .
    Colon,    // :
    Assign,   // =

    // Binary operators
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Lt,      // <
    Gt,      // >
    LtEq,    // <=
    GtEq,    // >=
    EqEq,    // ==
    NotEq,   // !=
    AndAnd,  // &&
    OrOr,    // ||
    Amp,     // &
    Pipe,    // |
    Caret,   // ^

    // Special
    Eof,
}

impl TokenKind {
    /// Source spelling of punctuation and operator tokens
    pub fn symbol(self) -> Option<&'static str> {
        let s = match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Identifier | TokenKind::Number | TokenKind::String | TokenKind::Eof => {
                return None;
            }
        };
        Some(s)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Eof => write!(f, "end of input"),
            other => match other.symbol() {
                Some(s) => write!(f, "'{}'", s),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,                 // 1-indexed
    pub column: usize,               // 1-indexed
    pub string_id: Option<StringId>, // For identifiers, numbers and strings
}

impl Token {
    pub fn text<'a>(&self, storage: &'a StringStorage) -> Option<&'a str> {
        self.string_id.map(|id| storage.resolve(id))
    }
}

/// Lexed token stream, always terminated by exactly one `Eof`
#[derive(Debug, Clone)]
pub struct Tokens {
    list: Vec<Token>,
    string_storage: StringStorage,
}

impl Tokens {
    pub fn new(mut tokens: Vec<Token>, storage: StringStorage) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token {
                kind: TokenKind::Eof,
                line,
                column,
                string_id: None,
            });
        }

        Self {
            list: tokens,
            string_storage: storage,
        }
    }

    /// Token at `index`, or the trailing `Eof` when past the end
    pub fn get(&self, index: usize) -> &Token {
        &self.list[index.min(self.list.len() - 1)]
    }

    /// Number of tokens, the trailing `Eof` included; never zero
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.list.iter()
    }

    pub fn strings(&self) -> &StringStorage {
        &self.string_storage
    }

    pub fn into_strings(self) -> StringStorage {
        self.string_storage
    }
}

#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub pos: usize,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Lexical error at {}:{}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

// Character classes

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct CharClass: u8 {
        const WHITESPACE = 1 << 0;
        const IDENT_START = 1 << 1;
        const IDENT_CONTINUE = 1 << 2;
        const DIGIT = 1 << 3;
        const HEX_DIGIT = 1 << 4;
        const QUOTE = 1 << 5;
    }
}

fn char_class(c: char) -> CharClass {
    let mut class = CharClass::empty();
    if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
        class |= CharClass::WHITESPACE;
    }
    if c.is_ascii_alphabetic() || c == '_' {
        class |= CharClass::IDENT_START | CharClass::IDENT_CONTINUE;
    }
    if c.is_ascii_digit() {
        class |= CharClass::DIGIT | CharClass::IDENT_CONTINUE;
    }
    if c.is_ascii_hexdigit() {
        class |= CharClass::HEX_DIGIT;
    }
    if c == '"' || c == '\'' {
        class |= CharClass::QUOTE;
    }
    class
}

fn is(c: char, class: CharClass) -> bool {
    char_class(c).intersects(class)
}

// Lexer

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    pos: usize,
    line: usize,
    column: usize,
    limits: &'a ParseLimits,
    token_count: usize,
    string_storage: StringStorage,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, limits: &'a ParseLimits) -> Result<Self, LexError> {
        if source.len() > limits.max_input_size {
            return Err(LexError {
                message: format!(
                    "Input too large: {} bytes (max: {} bytes)",
                    source.len(),
                    limits.max_input_size
                ),
                line: 1,
                column: 1,
                pos: 0,
            });
        }

        Ok(Self {
            source,
            chars: source.char_indices().peekable(),
            pos: 0,
            line: 1,
            column: 1,
            limits,
            token_count: 0,
            string_storage: StringStorage::new(),
        })
    }

    // Character navigation methods

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_char2(&mut self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.peek().map(|(_, c)| *c)
    }

    fn consume_char(&mut self) -> Option<char> {
        let (pos, ch) = self.chars.next()?;
        self.pos = pos + ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn consume_while<F>(&mut self, predicate: F) -> bool
    where
        F: Fn(char) -> bool,
    {
        let mut consumed = false;
        while let Some(c) = self.peek_char() {
            if !predicate(c) {
                break;
            }
            self.consume_char();
            consumed = true;
        }
        consumed
    }

    /// Skip whitespace and `//` line comments
    fn skip_trivia(&mut self) {
        loop {
            self.consume_while(|c| is(c, CharClass::WHITESPACE));

            if self.peek_char() == Some('/') && self.peek_char2() == Some('/') {
                self.consume_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    fn error(&self, message: String) -> LexError {
        LexError {
            message,
            line: self.line,
            column: self.column,
            pos: self.pos,
        }
    }

    // Main tokenization method

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.token_count >= self.limits.max_token_count {
            return Err(self.error(format!(
                "Token limit exceeded: {} tokens (max: {})",
                self.token_count, self.limits.max_token_count
            )));
        }

        self.skip_trivia();

        let start_line = self.line;
        let start_column = self.column;

        let (kind, string_id) = match self.peek_char() {
            None => (TokenKind::Eof, None),
            Some(c) if is(c, CharClass::DIGIT) => self.lex_number()?,
            Some(c) if is(c, CharClass::IDENT_START) => self.lex_identifier()?,
            Some(c) if is(c, CharClass::QUOTE) => self.lex_string()?,
            Some(c) => (self.lex_operator(c)?, None),
        };

        self.token_count += 1;

        Ok(Token {
            kind,
            line: start_line,
            column: start_column,
            string_id,
        })
    }

    /// Lex punctuation and operators; `first` is the current, unconsumed character
    fn lex_operator(&mut self, first: char) -> Result<TokenKind, LexError> {
        let next = self.peek_char2();
        let (kind, two_chars) = match (first, next) {
            ('<', Some('=')) => (TokenKind::LtEq, true),
            ('>', Some('=')) => (TokenKind::GtEq, true),
            ('=', Some('=')) => (TokenKind::EqEq, true),
            ('!', Some('=')) => (TokenKind::NotEq, true),
            ('&', Some('&')) => (TokenKind::AndAnd, true),
            ('|', Some('|')) => (TokenKind::OrOr, true),
            ('(', _) => (TokenKind::LParen, false),
            (')', _) => (TokenKind::RParen, false),
            ('[', _) => (TokenKind::LBracket, false),
            (']', _) => (TokenKind::RBracket, false),
            ('{', _) => (TokenKind::LBrace, false),
            ('}', _) => (TokenKind::RBrace, false),
            (',', _) => (TokenKind::Comma, false),
            ('.', _) => (TokenKind::Dot, false),
            (':', _) => (TokenKind::Colon, false),
            ('=', _) => (TokenKind::Assign, false),
            ('+', _) => (TokenKind::Plus, false),
            ('-', _) => (TokenKind::Minus, false),
            ('*', _) => (TokenKind::Star, false),
            ('/', _) => (TokenKind::Slash, false),
            ('%', _) => (TokenKind::Percent, false),
            ('<', _) => (TokenKind::Lt, false),
            ('>', _) => (TokenKind::Gt, false),
            ('&', _) => (TokenKind::Amp, false),
            ('|', _) => (TokenKind::Pipe, false),
            ('^', _) => (TokenKind::Caret, false),
            (c, _) => return Err(self.error(format!("Unexpected character: '{}'", c))),
        };

        self.consume_char();
        if two_chars {
            self.consume_char();
        }
        Ok(kind)
    }

    // Identifier lexing (keywords included)

    fn lex_identifier(&mut self) -> Result<(TokenKind, Option<StringId>), LexError> {
        let start = self.pos;
        self.consume_while(|c| is(c, CharClass::IDENT_CONTINUE));
        let text = &self.source[start..self.pos];

        if text.len() > self.limits.max_identifier_length {
            return Err(self.error(format!(
                "Identifier too long: {} bytes (max: {} bytes)",
                text.len(),
                self.limits.max_identifier_length
            )));
        }

        let string_id = self.string_storage.intern(text);
        Ok((TokenKind::Identifier, Some(string_id)))
    }

    // Number lexing

    fn lex_number(&mut self) -> Result<(TokenKind, Option<StringId>), LexError> {
        let start = self.pos;

        if self.peek_char() == Some('0') && matches!(self.peek_char2(), Some('x' | 'X')) {
            self.consume_char(); // '0'
            self.consume_char(); // 'x'
            let has_digits = self.consume_while(|c| is(c, CharClass::HEX_DIGIT) || c == '_');
            if !has_digits {
                return Err(self.error("Hex number must have at least one digit".into()));
            }
        } else {
            self.lex_decimal()?;
        }

        if self.peek_char().is_some_and(|c| is(c, CharClass::IDENT_START)) {
            return Err(self.error("Identifier directly after number".into()));
        }

        let text = &self.source[start..self.pos];
        let string_id = self.string_storage.intern(text);
        Ok((TokenKind::Number, Some(string_id)))
    }

    fn lex_decimal(&mut self) -> Result<(), LexError> {
        self.consume_while(|c| is(c, CharClass::DIGIT) || c == '_');

        // A '.' only continues the number when a digit follows: `a[0].b`
        if self.peek_char() == Some('.') && self.peek_char2().is_some_and(|c| is(c, CharClass::DIGIT))
        {
            self.consume_char(); // '.'
            self.consume_while(|c| is(c, CharClass::DIGIT) || c == '_');
        }

        if let Some('e' | 'E') = self.peek_char() {
            self.consume_char();
            if let Some('+' | '-') = self.peek_char() {
                self.consume_char();
            }
            let has_exp = self.consume_while(|c| is(c, CharClass::DIGIT) || c == '_');
            if !has_exp {
                return Err(self.error("Number exponent must have digits".into()));
            }
        }

        Ok(())
    }

    // String lexing

    fn lex_string(&mut self) -> Result<(TokenKind, Option<StringId>), LexError> {
        let string_start = self.pos;
        let Some(quote) = self.consume_char() else {
            return Err(self.error("Unterminated string literal".into()));
        };
        let content_start = self.pos;

        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error("Unterminated string literal".into()));
                }
                Some('\n') => {
                    return Err(self.error("Newline in string literal".into()));
                }
                Some('\\') => {
                    self.consume_char(); // backslash
                    if self.consume_char().is_none() {
                        return Err(self.error("Unterminated escape sequence".into()));
                    }
                }
                Some(c) if c == quote => {
                    let content_end = self.pos;
                    self.consume_char(); // closing quote

                    let string_len = self.pos - string_start;
                    if string_len > self.limits.max_string_length {
                        return Err(self.error(format!(
                            "String literal too long: {} bytes (max: {} bytes)",
                            string_len, self.limits.max_string_length
                        )));
                    }

                    // Escapes are kept verbatim, quotes are dropped
                    let content = &self.source[content_start..content_end];
                    let string_id = self.string_storage.intern(content);
                    return Ok((TokenKind::String, Some(string_id)));
                }
                Some(_) => {
                    self.consume_char();
                }
            }
        }
    }
}

// Public API

pub fn lex(source: &str, limits: &ParseLimits) -> Result<Tokens, LexError> {
    let mut lexer = Lexer::new(source, limits)?;
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }

    log::trace!(
        "lexed {} tokens, {} distinct strings",
        tokens.len(),
        lexer.string_storage.len()
    );
    Ok(Tokens::new(tokens, lexer.string_storage))
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_single(source: &str) -> Result<(Token, StringStorage), LexError> {
        let limits = ParseLimits::default();
        let mut lexer = Lexer::new(source, &limits)?;
        let token = lexer.next_token()?;
        Ok((token, lexer.string_storage))
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        let tokens = lex(source, &ParseLimits::default()).unwrap();
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_are_identifiers() {
        for kw in ["while", "if", "else", "for", "in", "of", "to", "step", "fn", "return"] {
            let (tok, storage) = lex_single(kw).unwrap();
            assert_eq!(tok.kind, TokenKind::Identifier);
            assert_eq!(tok.text(&storage), Some(kw));
        }
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(lex_single("foo").unwrap().0.kind, TokenKind::Identifier);
        assert_eq!(lex_single("_bar").unwrap().0.kind, TokenKind::Identifier);
        assert_eq!(lex_single("baz123").unwrap().0.kind, TokenKind::Identifier);
    }

    #[test]
    fn test_numbers() {
        for src in ["42", "1_000", "3.14", "1.5e10", "2.5e-3", "0xFF", "7E2"] {
            let (tok, storage) = lex_single(src).unwrap();
            assert_eq!(tok.kind, TokenKind::Number, "{}", src);
            assert_eq!(tok.text(&storage), Some(src));
        }
    }

    #[test]
    fn test_number_followed_by_member_access() {
        assert_eq!(
            kinds("1.x"),
            vec![
                TokenKind::Number,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_strings() {
        let (tok, storage) = lex_single(r#""hello""#).unwrap();
        assert_eq!(tok.kind, TokenKind::String);
        assert_eq!(tok.text(&storage), Some("hello"));

        let (tok, storage) = lex_single("'world'").unwrap();
        assert_eq!(tok.text(&storage), Some("world"));

        let (tok, storage) = lex_single(r#""quote: \"hi\"""#).unwrap();
        assert_eq!(tok.text(&storage), Some(r#"quote: \"hi\""#));

        let (tok, storage) = lex_single("''").unwrap();
        assert_eq!(tok.text(&storage), Some(""));
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("( ) [ ] { } , . : ="),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::Assign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / % < > <= >= == != && || & | ^"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Amp,
                TokenKind::Pipe,
                TokenKind::Caret,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines_are_skipped() {
        assert_eq!(
            kinds("// leading comment\nx // trailing\n\n  1 / 2"),
            vec![
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::Slash,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_position_tracking() {
        let tokens = lex("foo bar\n  baz", &ParseLimits::default()).unwrap();

        assert_eq!((tokens.get(0).line, tokens.get(0).column), (1, 1));
        assert_eq!((tokens.get(1).line, tokens.get(1).column), (1, 5));
        assert_eq!((tokens.get(2).line, tokens.get(2).column), (2, 3));
        // Past the end clamps to Eof
        assert_eq!(tokens.get(99).kind, TokenKind::Eof);
    }

    #[test]
    fn test_empty_source() {
        let tokens = lex("", &ParseLimits::default()).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get(0).kind, TokenKind::Eof);
    }

    #[test]
    fn test_tokens_new_appends_eof() {
        let tokens = Tokens::new(Vec::new(), StringStorage::new());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get(0).kind, TokenKind::Eof);
        assert_eq!(tokens.get(5).kind, TokenKind::Eof);
    }

    #[test]
    fn test_unexpected_character_position() {
        let err = lex("@", &ParseLimits::default()).unwrap_err();
        assert_eq!((err.line, err.column, err.pos), (1, 1, 0));

        let err = lex("x = 1
  y # 2", &ParseLimits::default()).unwrap_err();
        assert_eq!((err.line, err.column), (2, 5));
        assert!(err.message.contains("'#'"));
    }

    #[test]
    fn test_errors() {
        assert!(lex_single(r#""hello"#).is_err());
        assert!(lex_single("\"hello\nworld\"").is_err());
        assert!(lex_single("0x").is_err());
        assert!(lex_single("1e").is_err());
        assert!(lex_single("12abc").is_err());
        assert!(lex_single("!").is_err());
        assert!(lex_single("@").is_err());
    }

    #[test]
    fn test_limits() {
        let limits = ParseLimits {
            max_identifier_length: 3,
            max_token_count: 2,
            ..ParseLimits::default()
        };
        assert!(lex("abcd", &limits).is_err());
        assert!(lex("a b c", &limits).is_err());
        assert!(lex("a", &limits).is_ok());
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::RParen.to_string(), "')'");
        assert_eq!(TokenKind::LtEq.to_string(), "'<='");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
        assert_eq!(TokenKind::Identifier.to_string(), "identifier");
    }
}
