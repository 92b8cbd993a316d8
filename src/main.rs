use cassia::cli::{self, CliError, EvalOptions, TokensOptions};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "cassia")]
#[command(about = "Cassia - tokenize and evaluate template binding expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of an expression in evaluation order
    Tokens {
        /// The expression to tokenize
        expr: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Evaluate an expression against a JSON context
    Eval {
        /// The expression to evaluate
        expr: String,

        /// JSON context object (reads from stdin if not provided)
        #[arg(short, long)]
        context: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tokens { expr, pretty } => run_tokens(expr, pretty),
        Commands::Eval {
            expr,
            context,
            pretty,
        } => run_eval(expr, context, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_tokens(expr: String, pretty: bool) -> Result<(), CliError> {
    let options = TokensOptions { expr };
    let output = cli::execute_tokens(&options)?;
    print_json(&output, pretty)
}

fn run_eval(expr: String, context: Option<String>, pretty: bool) -> Result<(), CliError> {
    let context = match context {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            if buffer.trim().is_empty() {
                None
            } else {
                Some(buffer)
            }
        }
        None => None,
    };

    let options = EvalOptions { expr, context };
    let output = cli::execute_eval(&options)?;
    print_json(&output, pretty)
}

fn print_json(output: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    }
    .map_err(CliError::Json)?;
    println!("{}", json);
    Ok(())
}
