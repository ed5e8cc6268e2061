mod cli;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands, LexArgs, ParseArgs};
use tern::{Config, Error, Grouping, lexer};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Parse(args) => run_parse(args),
        Commands::Lex(args) => run_lex(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_parse(args: ParseArgs) -> Result<(), Error> {
    let mut config = Config::from_file(&args.config)?;
    if args.precedence {
        config.options.grouping = Grouping::Precedence;
    }

    let source = tern::read_source(&args.file)?;
    log::info!("parsing {} ({} bytes)", args.file.display(), source.len());

    let ast = tern::parse_source(&source, &config)?;
    // Printing and dropping recurse as deep as parsing did
    let tree = tern::parser::with_depth_stack(&config.limits, move || ast.to_string())?;
    print!("{}", tree);
    Ok(())
}

fn run_lex(args: LexArgs) -> Result<(), Error> {
    let config = Config::from_file(&args.config)?;
    let source = tern::read_source(&args.file)?;

    let tokens = lexer::lex(&source, &config.limits)?;
    for token in tokens.iter() {
        match token.text(tokens.strings()) {
            Some(text) => println!(
                "{}:{} {:?} '{}'",
                token.line, token.column, token.kind, text
            ),
            None => println!("{}:{} {:?}", token.line, token.column, token.kind),
        }
    }
    Ok(())
}
