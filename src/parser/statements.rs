use super::{ParseError, Parser};
use crate::ast::{AssignOp, Block, NodeList, Stmt, Stmts};
use crate::lexer::TokenKind;

// Recursive statement parsing methods
impl Parser<'_> {
    /// stmts = stmt*, up to end of input or a closing `}`
    pub(super) fn parse_stmts(&mut self, depth: usize) -> Result<Stmts, ParseError> {
        self.check_depth(depth)?;

        let mut stmts = NodeList::new();
        while !self.cursor.at(TokenKind::Eof) && !self.cursor.at(TokenKind::RBrace) {
            stmts.append(self.parse_stmt(depth + 1)?);
        }

        self.node(Stmts(stmts.into_vec()))
    }

    /// block = { stmts }
    pub(super) fn parse_block(&mut self, depth: usize) -> Result<Block, ParseError> {
        self.check_depth(depth)?;

        self.cursor.expect(TokenKind::LBrace)?;
        let stmts = self.parse_stmts(depth + 1)?;
        self.cursor.expect(TokenKind::RBrace)?;

        self.node(Block(stmts))
    }

    /// Parse a single statement
    pub(super) fn parse_stmt(&mut self, depth: usize) -> Result<Stmt, ParseError> {
        self.check_depth(depth)?;

        if self.cursor.at(TokenKind::LBrace) {
            let block = self.parse_block(depth + 1)?;
            return Ok(Stmt::Block(block));
        }

        let stmt = if self.cursor.matches_keyword("while") {
            self.parse_while(depth + 1)?
        } else if self.cursor.matches_keyword("if") {
            self.parse_if(depth + 1)?
        } else if self.cursor.matches_keyword("for") {
            self.parse_for(depth + 1)?
        } else if self.cursor.matches_keyword("return") {
            self.cursor.advance();
            Stmt::Return(self.parse_expr(depth + 1)?)
        } else if self.cursor.matches_keyword("continue") {
            self.cursor.advance();
            self.node(Stmt::Continue)?
        } else if self.cursor.matches_keyword("break") {
            self.cursor.advance();
            self.node(Stmt::Break)?
        } else {
            self.parse_assign_or_expr(depth + 1)?
        };

        // The Stmt wrapper around the concrete statement
        self.node(stmt)
    }

    /// while expr stmt
    fn parse_while(&mut self, depth: usize) -> Result<Stmt, ParseError> {
        self.cursor.advance(); // consume 'while'

        let cond = self.parse_expr(depth + 1)?;
        let body = self.parse_stmt(depth + 1)?;

        self.node(Stmt::While {
            cond,
            body: Box::new(body),
        })
    }

    /// if expr stmt (else stmt)?
    fn parse_if(&mut self, depth: usize) -> Result<Stmt, ParseError> {
        self.cursor.advance(); // consume 'if'

        let cond = self.parse_expr(depth + 1)?;
        let then = self.parse_stmt(depth + 1)?;

        let otherwise = if self.cursor.matches_keyword("else") {
            self.cursor.advance();
            Some(Box::new(self.parse_stmt(depth + 1)?))
        } else {
            None
        };

        self.node(Stmt::If {
            cond,
            then: Box::new(then),
            otherwise,
        })
    }

    /// for Id (in | of) expr stmt
    /// for Id = expr to expr (step expr)? stmt
    fn parse_for(&mut self, depth: usize) -> Result<Stmt, ParseError> {
        self.cursor.advance(); // consume 'for'

        let var = self.parse_ident()?;

        let each = if self.cursor.matches_keyword("in") {
            Some(true)
        } else if self.cursor.matches_keyword("of") {
            Some(false)
        } else {
            None
        };

        if let Some(is_in) = each {
            self.cursor.advance(); // consume 'in' / 'of'
            let iterable = self.parse_expr(depth + 1)?;
            let body = Box::new(self.parse_stmt(depth + 1)?);

            let stmt = if is_in {
                Stmt::ForIn {
                    var,
                    iterable,
                    body,
                }
            } else {
                Stmt::ForOf {
                    var,
                    iterable,
                    body,
                }
            };
            return self.node(stmt);
        }

        self.cursor.expect(TokenKind::Assign)?;
        let from = self.parse_expr(depth + 1)?;

        // `to` has no token kind of its own; it is compared as text only here
        self.cursor.expect_keyword("to")?;
        let to = self.parse_expr(depth + 1)?;

        let step = if self.cursor.matches_keyword("step") {
            self.cursor.advance();
            Some(self.parse_expr(depth + 1)?)
        } else {
            None
        };

        let body = self.parse_stmt(depth + 1)?;

        self.node(Stmt::ForTo {
            var,
            from,
            to,
            step,
            body: Box::new(body),
        })
    }

    /// (Id (= | :))? expr
    ///
    /// Two tokens of lookahead tell `x = 1` from `x(1)`: consume the
    /// identifier, and if no assignment operator follows, rewind and parse the
    /// whole statement as an expression. The checkpoint never outlives this call.
    fn parse_assign_or_expr(&mut self, depth: usize) -> Result<Stmt, ParseError> {
        let checkpoint = self.cursor.checkpoint();

        if self.cursor.at(TokenKind::Identifier) {
            let name = self.cursor.advance();

            if let Some(op) = AssignOp::from_token(self.cursor.kind()) {
                self.cursor.advance();
                let target = self.ident_from(&name)?;
                let value = self.parse_expr(depth + 1)?;
                return self.node(Stmt::Assign { op, target, value });
            }

            self.cursor.restore(checkpoint);
        }

        Ok(Stmt::Expr(self.parse_expr(depth + 1)?))
    }
}
