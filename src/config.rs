// Parser configuration
//
// Resource limits guard against:
// - Stack overflow from deeply nested blocks and expressions
// - Memory exhaustion from very large source files
//
// Everything has a permissive default and can be overridden in tern.toml:
//
//     [limits]
//     max_nesting_depth = 128
//
//     [parser]
//     grouping = "precedence"

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Resource limits applied while lexing and parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseLimits {
    // Lexer limits
    pub max_input_size: usize,        // Maximum source size in bytes
    pub max_token_count: usize,       // Maximum number of tokens per source
    pub max_identifier_length: usize, // Maximum identifier length in bytes
    pub max_string_length: usize,     // Maximum string literal length in bytes

    // Parser limits
    /// Maximum production recursion depth
    ///
    /// Counted in grammar productions, not source brackets: one level of
    /// `[...]` costs three, and in the default chain grouping every binary
    /// operator adds one, so `a + b + c` is as deep as two nested brackets.
    /// A long flat operator chain can therefore hit this limit.
    pub max_nesting_depth: usize,
    pub max_ast_nodes: usize, // Maximum nodes per tree
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000, // 10 MB
            max_token_count: 1_000_000,
            max_identifier_length: 1_000,
            max_string_length: 1_000_000, // 1 MB
            max_nesting_depth: 256,
            max_ast_nodes: 1_000_000,
        }
    }
}

impl ParseLimits {
    /// Largest accepted `max_nesting_depth`; the parser thread's stack is
    /// sized from it
    pub const MAX_NESTING_DEPTH: usize = 4_096;

    /// Check that every limit is positive and not absurdly large
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_REASONABLE: usize = 100_000_000; // 100 MB

        if self.max_input_size == 0 || self.max_input_size > MAX_REASONABLE {
            return Err(ConfigError::invalid("max_input_size", self.max_input_size));
        }

        if self.max_token_count == 0 || self.max_token_count > MAX_REASONABLE {
            return Err(ConfigError::invalid("max_token_count", self.max_token_count));
        }

        if self.max_identifier_length == 0 || self.max_identifier_length > 100_000 {
            return Err(ConfigError::invalid(
                "max_identifier_length",
                self.max_identifier_length,
            ));
        }

        if self.max_string_length == 0 || self.max_string_length > MAX_REASONABLE {
            return Err(ConfigError::invalid(
                "max_string_length",
                self.max_string_length,
            ));
        }

        if self.max_nesting_depth == 0 || self.max_nesting_depth > Self::MAX_NESTING_DEPTH {
            return Err(ConfigError::invalid(
                "max_nesting_depth",
                self.max_nesting_depth,
            ));
        }

        if self.max_ast_nodes == 0 || self.max_ast_nodes > 10_000_000 {
            return Err(ConfigError::invalid("max_ast_nodes", self.max_ast_nodes));
        }

        Ok(())
    }
}

/// How a chain of binary operators is grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// `item (op expr)?`: every operator swallows the rest of the expression
    #[default]
    Chain,
    /// Precedence climbing, left-associative within a level
    Precedence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub grouping: Grouping,
}

/// Everything read from tern.toml
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub limits: ParseLimits,
    pub options: ParseOptions,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults
    ///
    /// A missing file is not an error; malformed TOML or invalid limits are.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        let config = Self::from_toml_str(&content).map_err(|e| ConfigError {
            message: format!("{}: {}", path.display(), e.message),
        })?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse configuration text, overriding only the values it names
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError {
            message: format!("Failed to parse config: {}", e),
        })?;

        let mut config = Self::default();

        if let Some(limits) = file.limits {
            let target = &mut config.limits;
            let overrides = [
                (limits.max_input_size, &mut target.max_input_size),
                (limits.max_token_count, &mut target.max_token_count),
                (limits.max_identifier_length, &mut target.max_identifier_length),
                (limits.max_string_length, &mut target.max_string_length),
                (limits.max_nesting_depth, &mut target.max_nesting_depth),
                (limits.max_ast_nodes, &mut target.max_ast_nodes),
            ];
            for (value, slot) in overrides {
                if let Some(v) = value {
                    *slot = v;
                }
            }
        }

        if let Some(grouping) = file.parser.and_then(|p| p.grouping) {
            config.options.grouping = grouping;
        }

        config.limits.validate()?;
        Ok(config)
    }
}

/// TOML configuration structures for deserialization
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    limits: Option<LimitsSection>,
    parser: Option<ParserSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsSection {
    max_input_size: Option<usize>,
    max_token_count: Option<usize>,
    max_identifier_length: Option<usize>,
    max_string_length: Option<usize>,
    max_nesting_depth: Option<usize>,
    max_ast_nodes: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParserSection {
    grouping: Option<Grouping>,
}

/// Error type for config loading and limit validation
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    fn invalid(name: &str, value: usize) -> Self {
        Self {
            message: format!(
                "Invalid limit '{}': {} (must be positive and reasonable)",
                name, value
            ),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Config error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
