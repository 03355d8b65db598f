use clap::{Parser as ClapParser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tick_expr::cli::{self, CliError, EvalOptions, ResultMode};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "tick")]
#[command(about = "tick - evaluate stateful TICK expressions over streams of JSON records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression once per JSON line
    Eval {
        /// JSON-encoded AST, or @FILE to read it from a file
        ast: String,

        /// JSON lines input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Expect numeric results instead of booleans
        #[arg(short, long)]
        num: bool,

        /// Reset function state every N records (N >= 1)
        #[arg(short, long, value_name = "N")]
        window: Option<usize>,

        /// Stop at the first record that fails to decode or evaluate
        #[arg(long)]
        fail_fast: bool,
    },

    /// Validate a JSON-encoded AST
    Check {
        /// JSON-encoded AST, or @FILE to read it from a file
        ast: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            ast,
            input,
            num,
            window,
            fail_fast,
        } => run_eval(ast, input, num, window, fail_fast),
        Commands::Check { ast } => read_ast(ast)
            .and_then(|ast| cli::execute_check(&ast))
            .map(|_| println!("AST is valid")),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_ast(ast: String) -> Result<String, CliError> {
    match ast.strip_prefix('@') {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(ast),
    }
}

fn run_eval(
    ast: String,
    input: Option<PathBuf>,
    num: bool,
    window: Option<usize>,
    fail_fast: bool,
) -> Result<(), CliError> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None if !atty::is(atty::Stream::Stdin) => Box::new(io::stdin().lock()),
        None => return Err(CliError::NoInput),
    };

    let options = EvalOptions {
        ast: read_ast(ast)?,
        mode: if num { ResultMode::Num } else { ResultMode::Bool },
        window,
        fail_fast,
    };

    let summary = cli::execute_eval(&options, reader, &mut io::stdout().lock())?;
    tracing::info!(
        records = summary.records,
        errors = summary.errors,
        "input exhausted"
    );
    Ok(())
}
