use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::scanner::Scanner;
use rox::token::Token;
use rox::{RunError, Session};

/// Exit code for malformed input (lexical, syntax or static errors).
const EXIT_DATA_ERR: u8 = 65;

/// Exit code for a runtime error.
const EXIT_SOFTWARE: u8 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// Log file written when --log is given
    #[arg(long, global = true, default_value = "rox.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt (the default)
    Repl,
}

/// Reads a whole source file, rejecting invalid UTF‑8.
fn read_source(filename: &Path) -> rox::Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader.read_to_end(&mut buf)?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(String::from_utf8(buf)?)
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    // Compact "[module:line] - message" lines, Debug by default, RUST_LOG wins.
    Builder::new()
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
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn tokenize(filename: &Path, json: bool) -> Result<ExitCode> {
    let source = read_source(filename).context(format!("Failed to read {:?}", filename))?;
    let (tokens, errors) = Scanner::new(&source).scan_tokens();

    for e in &errors {
        debug!("Tokenization error: {}", e);
        eprintln!("{}", e);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        tokens.iter().for_each(|token: &Token| println!("{}", token));
    }

    if errors.is_empty() {
        info!("Tokenization completed successfully");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_DATA_ERR))
    }
}

fn run_file(filename: &Path) -> Result<ExitCode> {
    let source = read_source(filename).context(format!("Failed to read {:?}", filename))?;
    let mut session = Session::new();

    match session.run(&source) {
        Ok(()) => {
            info!("Program executed successfully");
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ RunError::Static(_)) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(EXIT_DATA_ERR))
        }
        Err(e @ RunError::Runtime(_)) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(EXIT_SOFTWARE))
        }
    }
}

fn repl() -> Result<ExitCode> {
    info!("Starting REPL");

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if read == 0 {
            println!();
            return Ok(ExitCode::SUCCESS);
        }

        if let Err(e) = session.run(&line) {
            debug!("REPL line failed: {}", e);
            eprintln!("{}", e);
        }
    }
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Tokenize { filename, json } => tokenize(&filename, json),
        Commands::Run { filename } => run_file(&filename),
        Commands::Repl => repl(),
    }
}
