// Syntax tree
//
// Every node owns its children; the tree is never shared or cyclic.
// Child arity is fixed by the variant: optional children are `Option`,
// list-shaped children are `Vec` in source order.

mod dump;
mod list;

pub use list::NodeList;

use crate::lexer::TokenKind;
use crate::string_storage::{StringId, StringStorage};

/// A parsed program: the root statement list plus the strings its leaves name
#[derive(Debug, Clone)]
pub struct Ast {
    pub root: Stmts,
    pub strings: StringStorage,
}

impl Ast {
    pub fn resolve(&self, id: StringId) -> &str {
        self.strings.resolve(id)
    }

    pub fn name(&self, ident: Ident) -> &str {
        self.strings.resolve(ident.0)
    }
}

/// Identifier leaf (`Id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident(pub StringId);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stmts(pub Vec<Stmt>);

/// `{ stmts }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block(pub Stmts);

/// One statement
///
/// A braced block in statement position is the `Block` itself; every other
/// variant is a `Stmt` node wrapping exactly one concrete statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    If {
        cond: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    ForIn {
        var: Ident,
        iterable: Expr,
        body: Box<Stmt>,
    },
    ForOf {
        var: Ident,
        iterable: Expr,
        body: Box<Stmt>,
    },
    ForTo {
        var: Ident,
        from: Expr,
        to: Expr,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    Return(Expr),
    Continue,
    Break,
    Assign {
        op: AssignOp,
        target: Ident,
        value: Expr,
    },
    Expr(Expr),
}

impl Stmt {
    /// Kind of the concrete statement (the child of the `Stmt` wrapper)
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::Block(_) => NodeKind::Block,
            Stmt::While { .. } => NodeKind::While,
            Stmt::If { .. } => NodeKind::If,
            Stmt::ForIn { .. } => NodeKind::ForIn,
            Stmt::ForOf { .. } => NodeKind::ForOf,
            Stmt::ForTo { .. } => NodeKind::ForTo,
            Stmt::Return(_) => NodeKind::Return,
            Stmt::Continue => NodeKind::Continue,
            Stmt::Break => NodeKind::Break,
            Stmt::Assign { op, .. } => NodeKind::Assign(*op),
            Stmt::Expr(expr) => expr.kind(),
        }
    }

    /// Whether this statement sits under a `Stmt` wrapper node
    pub fn is_wrapped(&self) -> bool {
        !matches!(self, Stmt::Block(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(StringId),
    Str(StringId),
    Term(Term),
    Function(Function),
    Array(Vec<Expr>),
    /// A braced block used as an expression
    Item(Block),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Num(_) => NodeKind::Num,
            Expr::Str(_) => NodeKind::Str,
            Expr::Term(_) => NodeKind::Term,
            Expr::Function(_) => NodeKind::Function,
            Expr::Array(_) => NodeKind::Array,
            Expr::Item(_) => NodeKind::Item,
            Expr::Binary { op, .. } => NodeKind::Binary(*op),
        }
    }
}

/// `name` followed by index, member and call suffixes in application order
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub head: Ident,
    pub suffixes: Vec<Suffix>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Suffix {
    Index(Expr),
    Member(Ident),
    Call(Args),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args(pub Vec<Expr>);

/// `fn (params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Params,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params(pub Vec<Param>);

/// `name` or `name: default`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign, // =
    Define, // :
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Assign => Some(AssignOp::Assign),
            TokenKind::Colon => Some(AssignOp::Define),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            TokenKind::AndAnd => BinaryOp::And,
            TokenKind::OrOr => BinaryOp::Or,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
        }
    }

    /// Binding strength in precedence grouping (higher binds tighter)
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::BitOr => 3,
            BinaryOp::BitXor => 4,
            BinaryOp::BitAnd => 5,
            BinaryOp::Eq | BinaryOp::Ne => 6,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 7,
            BinaryOp::Add | BinaryOp::Sub => 8,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 9,
        }
    }
}

/// Tag of every node the parser can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Num,
    Str,
    Id,
    Term,
    Args,
    Array,
    Params,
    Param,
    Function,
    Item,
    Block,
    Stmts,
    Stmt,
    While,
    If,
    ForIn,
    ForOf,
    ForTo,
    Return,
    Continue,
    Break,
    Index,
    Member,
    Assign(AssignOp),
    Binary(BinaryOp),
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NodeKind::Assign(_) => write!(f, "Assign"),
            NodeKind::Binary(_) => write!(f, "Binary"),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens_round_trip_through_symbols() {
        let kinds = [
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
        ];
        for kind in kinds {
            let op = BinaryOp::from_token(kind).unwrap();
            assert_eq!(Some(op.symbol()), kind.symbol());
        }
        assert_eq!(BinaryOp::from_token(TokenKind::Assign), None);
        assert_eq!(BinaryOp::from_token(TokenKind::Dot), None);
    }

    #[test]
    fn test_assign_ops() {
        assert_eq!(AssignOp::from_token(TokenKind::Assign), Some(AssignOp::Assign));
        assert_eq!(AssignOp::from_token(TokenKind::Colon), Some(AssignOp::Define));
        assert_eq!(AssignOp::from_token(TokenKind::EqEq), None);
    }

    #[test]
    fn test_precedence_levels() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Lt.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert_eq!(BinaryOp::Sub.precedence(), BinaryOp::Add.precedence());
    }

    #[test]
    fn test_kinds() {
        let mut strings = StringStorage::new();
        let x = Ident(strings.intern("x"));

        let stmt = Stmt::Expr(Expr::Term(Term {
            head: x,
            suffixes: vec![Suffix::Member(x), Suffix::Call(Args::default())],
        }));
        assert_eq!(stmt.kind(), NodeKind::Term);
        assert!(stmt.is_wrapped());
        assert!(!Stmt::Block(Block::default()).is_wrapped());

        let assign = Stmt::Assign {
            op: AssignOp::Define,
            target: x,
            value: Expr::Num(strings.intern("1")),
        };
        assert_eq!(assign.kind(), NodeKind::Assign(AssignOp::Define));
        assert_eq!(NodeKind::Binary(BinaryOp::Add).to_string(), "Binary");
        assert_eq!(NodeKind::ForTo.to_string(), "ForTo");
    }
}
