use super::{Expected, ParseError};
use crate::ast::Ident;
use crate::lexer::{Token, TokenKind};
use crate::string_storage::StringId;

// Parser helper methods
impl super::Parser<'_> {
    /// Check recursion depth limit
    pub(super) fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth >= self.limits.max_nesting_depth {
            let token = self.cursor.current();
            return Err(ParseError::NestingTooDeep {
                depth,
                max: self.limits.max_nesting_depth,
                line: token.line,
                column: token.column,
            });
        }
        Ok(())
    }

    /// Account for one freshly built node and hand it back
    pub(super) fn node<T>(&mut self, node: T) -> Result<T, ParseError> {
        if self.node_count >= self.limits.max_ast_nodes {
            return Err(ParseError::TooManyNodes {
                count: self.node_count + 1,
                max: self.limits.max_ast_nodes,
            });
        }
        self.node_count += 1;
        Ok(node)
    }

    /// Interned text of an identifier or literal token
    pub(super) fn payload(&self, token: &Token) -> Result<StringId, ParseError> {
        match token.string_id {
            Some(id) => Ok(id),
            None => Err(self.cursor.unexpected(Expected::Token(token.kind)).into()),
        }
    }

    /// `Id` leaf for an identifier token that was already consumed
    pub(super) fn ident_from(&mut self, token: &Token) -> Result<Ident, ParseError> {
        let id = self.payload(token)?;
        self.node(Ident(id))
    }

    /// Consume an identifier and build its `Id` leaf
    pub(super) fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        let token = self.cursor.expect(TokenKind::Identifier)?;
        self.ident_from(&token)
    }
}
