// Tern: lexer and recursive-descent parser for a small scripting language
pub mod ast;
pub mod config;
pub mod cursor;
pub mod lexer;
pub mod parser;
pub mod string_storage;

pub use ast::Ast;
pub use config::{Config, ConfigError, Grouping, ParseLimits, ParseOptions};
pub use lexer::LexError;
pub use parser::{Expected, ParseError, SyntaxError};

use std::path::PathBuf;

/// Any failure between reading a file and holding its syntax tree
#[derive(Debug)]
pub enum Error {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Config(ConfigError),
    Lex(LexError),
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "Failed to read {}: {}", path.display(), source),
            Error::Config(err) => write!(f, "{}", err),
            Error::Lex(err) => write!(f, "{}", err),
            Error::Parse(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Config(err) => Some(err),
            Error::Lex(err) => Some(err),
            Error::Parse(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Lex(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

/// Lex and parse `source` in one go
pub fn parse_source(source: &str, config: &Config) -> Result<Ast, Error> {
    let tokens = lexer::lex(source, &config.limits)?;
    let ast = parser::parse(tokens, &config.limits, config.options)?;
    Ok(ast)
}

/// Read a source file, keeping the path for error messages
pub fn read_source(path: impl Into<PathBuf>) -> Result<String, Error> {
    let path = path.into();
    std::fs::read_to_string(&path).map_err(|source| Error::Io { path, source })
}
