use crate::lexer::TokenKind;

/// What the grammar wanted at the failing position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    /// Raw keyword text, such as the `to` of a counting `for`
    Keyword(&'static str),
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Keyword(keyword) => write!(f, "keyword '{}'", keyword),
        }
    }
}

/// The current token did not have the kind the grammar required
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub expected: Expected,
    pub found: TokenKind,
    pub found_text: Option<String>, // For identifiers and literals
    pub line: usize,
    pub column: usize,
    pub token_idx: usize,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Syntax error at {}:{}: expected {}, found {}",
            self.line, self.column, self.expected, self.found
        )?;
        if let Some(text) = &self.found_text {
            write!(f, " '{}'", text)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Syntax(SyntaxError),
    NestingTooDeep {
        depth: usize,
        max: usize,
        line: usize,
        column: usize,
    },
    TooManyNodes {
        count: usize,
        max: usize,
    },
    /// The parser thread could not be started with the stack it needs
    ThreadSpawn {
        stack_size: usize,
        message: String,
    },
}

impl ParseError {
    /// The syntax error, if this is one
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParseError::Syntax(err) => write!(f, "{}", err),
            ParseError::NestingTooDeep {
                depth,
                max,
                line,
                column,
            } => write!(
                f,
                "Parse error at {}:{}: parser depth limit reached: {} levels (max {}); brackets, blocks and chained operators each add levels",
                line, column, depth, max
            ),
            ParseError::TooManyNodes { count, max } => write!(
                f,
                "Parse error: syntax tree too large: {} nodes (max {})",
                count, max
            ),
            ParseError::ThreadSpawn {
                stack_size,
                message,
            } => write!(
                f,
                "Parse error: cannot start parser thread with a {} byte stack: {}",
                stack_size, message
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message() {
        let err = SyntaxError {
            expected: Expected::Token(TokenKind::RParen),
            found: TokenKind::Eof,
            found_text: None,
            line: 1,
            column: 7,
            token_idx: 4,
        };
        assert_eq!(
            err.to_string(),
            "Syntax error at 1:7: expected ')', found end of input"
        );
    }

    #[test]
    fn test_syntax_error_message_with_text() {
        let err = ParseError::from(SyntaxError {
            expected: Expected::Keyword("to"),
            found: TokenKind::Identifier,
            found_text: Some("until".to_string()),
            line: 2,
            column: 13,
            token_idx: 9,
        });
        assert_eq!(
            err.to_string(),
            "Syntax error at 2:13: expected keyword 'to', found identifier 'until'"
        );
        assert!(err.as_syntax().is_some());
    }

    #[test]
    fn test_depth_error_does_not_blame_nesting_alone() {
        let err = ParseError::NestingTooDeep {
            depth: 256,
            max: 256,
            line: 1,
            column: 1009,
        };
        let message = err.to_string();
        assert!(message.starts_with("Parse error at 1:1009: parser depth limit reached"));
        assert!(message.contains("chained operators"));
        assert!(err.as_syntax().is_none());
    }
}
