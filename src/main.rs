use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{LoxError, StderrReporter};
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::scanner::{scan_tokens, Scanner};
use rox::session::{RunStatus, Session};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    /// Without a subcommand an interactive prompt is started
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token list as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let mut file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut buf = Vec::new();

    let bytes = file
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let source = String::from_utf8(buf).map_err(LoxError::from)?;

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // `[module:line] - message`, with the crate prefix stripped from the module
    Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Scan `source` and parse it as one expression, reporting any diagnostics.
fn parse_single_expression(source: &str) -> Option<rox::ast::Expr> {
    let mut reporter = StderrReporter;
    let (tokens, lex_errors) = scan_tokens(source);

    for e in &lex_errors {
        e.report(&mut reporter);
    }

    match Parser::new(tokens).parse_expression() {
        Ok(expr) if lex_errors.is_empty() => Some(expr),
        Ok(_) => None,
        Err(errors) => {
            for e in &errors {
                debug!("Parse debug: {}", e);
                e.report(&mut reporter);
            }
            None
        }
    }
}

fn tokenize(source: &str, json: bool) -> Result<RunStatus> {
    let mut reporter = StderrReporter;
    let mut tokenized = true;

    if json {
        let (tokens, errors) = scan_tokens(source);
        for e in &errors {
            e.report(&mut reporter);
        }
        tokenized = errors.is_empty();
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in Scanner::new(source) {
            match token {
                Ok(token) => println!("{}", token),
                Err(e) => {
                    tokenized = false;
                    e.report(&mut reporter);
                }
            }
        }
    }

    Ok(if tokenized {
        RunStatus::Ok
    } else {
        RunStatus::StaticError
    })
}

fn evaluate(source: &str) -> RunStatus {
    let Some(expr) = parse_single_expression(source) else {
        return RunStatus::StaticError;
    };

    let mut interpreter = Interpreter::new();

    match interpreter.evaluate(&expr) {
        Ok(value) => {
            debug!("Evaluated to: {}", value);
            println!("{}", value);
            RunStatus::Ok
        }
        Err(e) => {
            debug!("Evaluation debug: {}", e);
            e.report(&mut StderrReporter);
            RunStatus::RuntimeError
        }
    }
}

fn repl() -> Result<()> {
    info!("Starting interactive prompt");

    let mut session = Session::stdout(StderrReporter);
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let input = line.trim_end();
        if input == "exit" {
            break;
        }

        let status = session.run(input);
        debug!("Prompt submission finished: {:?}", status);
    }

    info!("Prompt closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let status: RunStatus = match args.commands {
        Some(Commands::Tokenize { filename, json }) => {
            info!("Running Tokenize subcommand");
            tokenize(&read_file(&filename)?, json)?
        }

        Some(Commands::Parse { filename }) => {
            info!("Running Parse subcommand");
            match parse_single_expression(&read_file(&filename)?) {
                Some(expr) => {
                    println!("{}", AstPrinter::print(&expr));
                    RunStatus::Ok
                }
                None => RunStatus::StaticError,
            }
        }

        Some(Commands::Evaluate { filename }) => {
            info!("Running Evaluate subcommand");
            evaluate(&read_file(&filename)?)
        }

        Some(Commands::Run { filename }) => {
            info!("Running Run subcommand");
            let source = read_file(&filename)?;
            Session::stdout(StderrReporter).run(&source)
        }

        Some(Commands::Repl) | None => {
            repl()?;
            RunStatus::Ok
        }
    };

    info!("Finished with {:?}", status);

    if status != RunStatus::Ok {
        std::process::exit(status.exit_code());
    }

    Ok(())
}
