// Recursive-descent parser, split by grammar layer
mod error;
mod expressions;
mod helpers;
mod statements;

// Public exports
pub use error::{Expected, ParseError, SyntaxError};

use std::thread;

use crate::ast::Ast;
use crate::config::{ParseLimits, ParseOptions};
use crate::cursor::TokenCursor;
use crate::lexer::Tokens;

/// Stack reserved per level of `max_nesting_depth`, enough for unoptimized builds
const STACK_PER_LEVEL: usize = 16 * 1024;

/// Stack for everything outside the recursive productions
const BASE_STACK: usize = 1024 * 1024;

/// State of one parse; dropped when the parse returns
///
/// Runs on the caller's stack; [`parse`] is the entry point that bounds it.
pub(crate) struct Parser<'a> {
    cursor: TokenCursor,
    limits: &'a ParseLimits,
    options: ParseOptions,
    node_count: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Tokens, limits: &'a ParseLimits, options: ParseOptions) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            limits,
            options,
            node_count: 0,
        }
    }

    /// Main parsing entry point: `program = stmts`
    ///
    /// Stops at end of input or at a `}` with no matching `{`; nothing after
    /// that point is examined.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let root = self.parse_stmts(0)?;
        log::debug!(
            "parsed {} statements, {} nodes, stopped at token {}",
            root.0.len(),
            self.node_count,
            self.cursor.position()
        );

        Ok(Ast {
            root,
            strings: self.cursor.into_strings(),
        })
    }
}

/// Run `work` on a thread whose stack grows with `limits.max_nesting_depth`
///
/// Parsing, printing and dropping a tree all recurse once per level, so any
/// of them stays within this stack up to the configured depth, however small
/// the caller's own stack is.
pub fn with_depth_stack<T, F>(limits: &ParseLimits, work: F) -> Result<T, ParseError>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let stack_size = limits
        .max_nesting_depth
        .saturating_mul(STACK_PER_LEVEL)
        .saturating_add(BASE_STACK);
    log::trace!("starting parser thread with a {} byte stack", stack_size);

    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name("tern-parser".to_string())
            .stack_size(stack_size)
            .spawn_scoped(scope, work)
            .map_err(|err| ParseError::ThreadSpawn {
                stack_size,
                message: err.to_string(),
            })?;

        match worker.join() {
            Ok(value) => Ok(value),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

// Public API function
pub fn parse(tokens: Tokens, limits: &ParseLimits, options: ParseOptions) -> Result<Ast, ParseError> {
    with_depth_stack(limits, move || Parser::new(tokens, limits, options).parse())?
}
