use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tern")]
#[command(about = "Tern language parser")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a Tern source file and print the AST
    Parse(ParseArgs),
    /// Tokenize a Tern source file and print one token per line
    Lex(LexArgs),
}

#[derive(clap::Args)]
pub struct ParseArgs {
    /// Input file path
    pub file: PathBuf,

    /// Configuration file; defaults apply when it does not exist
    #[arg(long, default_value = "tern.toml")]
    pub config: PathBuf,

    /// Group binary operators by precedence instead of the right chain
    #[arg(long)]
    pub precedence: bool,
}

#[derive(clap::Args)]
pub struct LexArgs {
    /// Input file path
    pub file: PathBuf,

    /// Configuration file; defaults apply when it does not exist
    #[arg(long, default_value = "tern.toml")]
    pub config: PathBuf,
}
