// Indented tree dump, one node per line:
//
//     Stmts
//       Stmt
//         Assign '='
//           Id 'x'
//           Num '1'
//
// Absent optional children print as `Absent` so fixed arity stays visible.

use std::fmt;

use super::{
    Args, Ast, Block, Expr, Function, Ident, NodeKind, Param, Params, Stmt, Stmts, Suffix, Term,
};
use crate::string_storage::{StringId, StringStorage};

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = TreeWriter {
            out: f,
            strings: &self.strings,
            depth: 0,
        };
        writer.stmts(&self.root)
    }
}

struct TreeWriter<'a, 'f> {
    out: &'a mut fmt::Formatter<'f>,
    strings: &'a StringStorage,
    depth: usize,
}

impl TreeWriter<'_, '_> {
    fn line(&mut self, kind: NodeKind, payload: Option<&str>) -> fmt::Result {
        write!(self.out, "{:width$}{}", "", kind, width = self.depth * 2)?;
        if let Some(payload) = payload {
            write!(self.out, " '{}'", payload)?;
        }
        writeln!(self.out)
    }

    fn leaf(&mut self, kind: NodeKind, id: StringId) -> fmt::Result {
        let strings = self.strings;
        self.line(kind, Some(strings.resolve(id)))
    }

    fn absent(&mut self) -> fmt::Result {
        writeln!(self.out, "{:width$}Absent", "", width = self.depth * 2)
    }

    /// Write a node header, then its children one level deeper
    fn node<F>(&mut self, kind: NodeKind, payload: Option<&str>, children: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.line(kind, payload)?;
        self.depth += 1;
        let result = children(self);
        self.depth -= 1;
        result
    }

    fn ident(&mut self, ident: Ident) -> fmt::Result {
        self.leaf(NodeKind::Id, ident.0)
    }

    fn stmts(&mut self, stmts: &Stmts) -> fmt::Result {
        self.node(NodeKind::Stmts, None, |w| {
            stmts.0.iter().try_for_each(|stmt| w.stmt(stmt))
        })
    }

    fn block(&mut self, block: &Block) -> fmt::Result {
        self.node(NodeKind::Block, None, |w| w.stmts(&block.0))
    }

    fn stmt(&mut self, stmt: &Stmt) -> fmt::Result {
        if stmt.is_wrapped() {
            self.node(NodeKind::Stmt, None, |w| w.statement(stmt))
        } else {
            self.statement(stmt)
        }
    }

    fn opt_stmt(&mut self, stmt: Option<&Stmt>) -> fmt::Result {
        match stmt {
            Some(stmt) => self.stmt(stmt),
            None => self.absent(),
        }
    }

    fn opt_expr(&mut self, expr: Option<&Expr>) -> fmt::Result {
        match expr {
            Some(expr) => self.expr(expr),
            None => self.absent(),
        }
    }

    /// The concrete statement under a `Stmt` wrapper
    fn statement(&mut self, stmt: &Stmt) -> fmt::Result {
        let kind = stmt.kind();
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::While { cond, body } => self.node(kind, None, |w| {
                w.expr(cond)?;
                w.stmt(body)
            }),
            Stmt::If {
                cond,
                then,
                otherwise,
            } => self.node(kind, None, |w| {
                w.expr(cond)?;
                w.stmt(then)?;
                w.opt_stmt(otherwise.as_deref())
            }),
            Stmt::ForIn {
                var,
                iterable,
                body,
            }
            | Stmt::ForOf {
                var,
                iterable,
                body,
            } => self.node(kind, None, |w| {
                w.ident(*var)?;
                w.expr(iterable)?;
                w.stmt(body)
            }),
            Stmt::ForTo {
                var,
                from,
                to,
                step,
                body,
            } => self.node(kind, None, |w| {
                w.ident(*var)?;
                w.expr(from)?;
                w.expr(to)?;
                w.opt_expr(step.as_ref())?;
                w.stmt(body)
            }),
            Stmt::Return(value) => self.node(kind, None, |w| w.expr(value)),
            Stmt::Continue | Stmt::Break => self.line(kind, None),
            Stmt::Assign { op, target, value } => self.node(kind, Some(op.symbol()), |w| {
                w.ident(*target)?;
                w.expr(value)
            }),
            Stmt::Expr(expr) => self.expr(expr),
        }
    }

    fn expr(&mut self, expr: &Expr) -> fmt::Result {
        let kind = expr.kind();
        match expr {
            Expr::Num(id) | Expr::Str(id) => self.leaf(kind, *id),
            Expr::Term(term) => self.term(term),
            Expr::Function(function) => self.function(function),
            Expr::Array(items) => self.node(kind, None, |w| {
                items.iter().try_for_each(|item| w.expr(item))
            }),
            Expr::Item(block) => self.node(kind, None, |w| w.block(block)),
            Expr::Binary { op, lhs, rhs } => self.node(kind, Some(op.symbol()), |w| {
                w.expr(lhs)?;
                w.expr(rhs)
            }),
        }
    }

    fn term(&mut self, term: &Term) -> fmt::Result {
        self.node(NodeKind::Term, None, |w| {
            w.ident(term.head)?;
            term.suffixes.iter().try_for_each(|suffix| w.suffix(suffix))
        })
    }

    fn suffix(&mut self, suffix: &Suffix) -> fmt::Result {
        match suffix {
            Suffix::Index(index) => self.node(NodeKind::Index, None, |w| w.expr(index)),
            Suffix::Member(name) => self.node(NodeKind::Member, None, |w| w.ident(*name)),
            Suffix::Call(args) => self.args(args),
        }
    }

    fn args(&mut self, args: &Args) -> fmt::Result {
        self.node(NodeKind::Args, None, |w| {
            args.0.iter().try_for_each(|arg| w.expr(arg))
        })
    }

    fn function(&mut self, function: &Function) -> fmt::Result {
        self.node(NodeKind::Function, None, |w| {
            w.params(&function.params)?;
            w.block(&function.body)
        })
    }

    fn params(&mut self, params: &Params) -> fmt::Result {
        self.node(NodeKind::Params, None, |w| {
            params.0.iter().try_for_each(|param| w.param(param))
        })
    }

    fn param(&mut self, param: &Param) -> fmt::Result {
        self.node(NodeKind::Param, None, |w| {
            w.ident(param.name)?;
            w.opt_expr(param.default.as_ref())
        })
    }
}
