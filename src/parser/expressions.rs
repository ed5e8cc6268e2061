use super::{ParseError, Parser};
use crate::ast::{Args, BinaryOp, Expr, Function, NodeList, Param, Params, Suffix, Term};
use crate::config::Grouping;
use crate::lexer::TokenKind;

// Recursive expression parsing methods
impl Parser<'_> {
    /// expr = item (op expr)?
    ///
    /// With the default grouping there is exactly one level and no
    /// precedence: the right operand swallows the rest of the expression, so
    /// `1 + 2 + 3` is `1 + (2 + 3)` and `1 * 2 + 3` is `1 * (2 + 3)`.
    pub(super) fn parse_expr(&mut self, depth: usize) -> Result<Expr, ParseError> {
        self.check_depth(depth)?;

        if self.options.grouping == Grouping::Precedence {
            return self.parse_expr_precedence(depth, 0);
        }

        let lhs = self.parse_item(depth + 1)?;
        let Some(op) = BinaryOp::from_token(self.cursor.kind()) else {
            return Ok(lhs);
        };
        self.cursor.advance();

        let rhs = self.parse_expr(depth + 1)?;
        self.node(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Precedence climbing, left-associative within a level
    fn parse_expr_precedence(
        &mut self,
        depth: usize,
        min_precedence: u8,
    ) -> Result<Expr, ParseError> {
        self.check_depth(depth)?;

        let mut lhs = self.parse_item(depth + 1)?;

        loop {
            let op = match BinaryOp::from_token(self.cursor.kind()) {
                Some(op) if op.precedence() >= min_precedence => op,
                _ => break,
            };
            self.cursor.advance();

            // One level tighter on the right keeps equal operators left-associative
            let rhs = self.parse_expr_precedence(depth + 1, op.precedence() + 1)?;
            lhs = self.node(Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })?;
        }

        Ok(lhs)
    }

    /// item = Num | Str | fn (params) block | array | block | ( expr ) | term
    pub(super) fn parse_item(&mut self, depth: usize) -> Result<Expr, ParseError> {
        self.check_depth(depth)?;

        match self.cursor.kind() {
            TokenKind::Number => {
                let token = self.cursor.advance();
                let id = self.payload(&token)?;
                self.node(Expr::Num(id))
            }
            TokenKind::String => {
                let token = self.cursor.advance();
                let id = self.payload(&token)?;
                self.node(Expr::Str(id))
            }
            TokenKind::Identifier if self.cursor.matches_keyword("fn") => {
                self.parse_function(depth + 1)
            }
            TokenKind::LBracket => {
                let items = self.parse_expr_list(depth + 1, TokenKind::LBracket, TokenKind::RBracket)?;
                self.node(Expr::Array(items))
            }
            TokenKind::LBrace => {
                // Wrapped so a block used as a value differs from a block statement
                let block = self.parse_block(depth + 1)?;
                self.node(Expr::Item(block))
            }
            TokenKind::LParen => {
                // Parentheses only group; they leave no node behind
                self.cursor.advance();
                let inner = self.parse_expr(depth + 1)?;
                self.cursor.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => {
                let term = self.parse_term(depth + 1)?;
                Ok(Expr::Term(term))
            }
        }
    }

    /// fn ( params ) block
    fn parse_function(&mut self, depth: usize) -> Result<Expr, ParseError> {
        self.check_depth(depth)?;

        self.cursor.advance(); // consume 'fn'
        self.cursor.expect(TokenKind::LParen)?;
        let params = self.parse_params(depth + 1)?;
        self.cursor.expect(TokenKind::RParen)?;
        let body = self.parse_block(depth + 1)?;

        self.node(Expr::Function(Function { params, body }))
    }

    /// params = (Id (: expr)?)*
    ///
    /// Parameters need no separator; a `,` between them is skipped.
    /// The closing `)` is left for the caller.
    pub(super) fn parse_params(&mut self, depth: usize) -> Result<Params, ParseError> {
        self.check_depth(depth)?;

        let mut params = NodeList::new();
        while !self.cursor.at(TokenKind::RParen) {
            let name = self.parse_ident()?;

            let default = if self.cursor.at(TokenKind::Colon) {
                self.cursor.advance();
                Some(self.parse_expr(depth + 1)?)
            } else {
                None
            };
            params.append(self.node(Param { name, default })?);

            if self.cursor.at(TokenKind::Comma) {
                self.cursor.advance();
            }
        }

        self.node(Params(params.into_vec()))
    }

    /// args = ( (expr ,)* expr? )
    pub(super) fn parse_args(&mut self, depth: usize) -> Result<Args, ParseError> {
        let args = self.parse_expr_list(depth, TokenKind::LParen, TokenKind::RParen)?;
        self.node(Args(args))
    }

    /// Comma-separated expressions between `open` and `close`, trailing comma allowed
    fn parse_expr_list(
        &mut self,
        depth: usize,
        open: TokenKind,
        close: TokenKind,
    ) -> Result<Vec<Expr>, ParseError> {
        self.check_depth(depth)?;

        self.cursor.expect(open)?;

        let mut items = NodeList::new();
        while !self.cursor.at(close) {
            items.append(self.parse_expr(depth + 1)?);
            if !self.cursor.at(close) {
                self.cursor.expect(TokenKind::Comma)?;
            }
        }

        self.cursor.expect(close)?;
        Ok(items.into_vec())
    }

    /// term = Id ( [ expr ] | . Id | args )*
    pub(super) fn parse_term(&mut self, depth: usize) -> Result<Term, ParseError> {
        self.check_depth(depth)?;

        let head = self.parse_ident()?;

        let mut suffixes = NodeList::new();
        loop {
            let suffix = match self.cursor.kind() {
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.parse_expr(depth + 1)?;
                    self.cursor.expect(TokenKind::RBracket)?;
                    Suffix::Index(index)
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    Suffix::Member(self.parse_ident()?)
                }
                TokenKind::LParen => Suffix::Call(self.parse_args(depth + 1)?),
                _ => break,
            };
            suffixes.append(self.node(suffix)?);
        }

        self.node(Term {
            head,
            suffixes: suffixes.into_vec(),
        })
    }
}
