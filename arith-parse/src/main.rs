use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arith_parse::error::CliError;
use arith_parse::parser::{self, LexOutput};
use arith_parse::report;

#[derive(Parser)]
#[command(name = "arith-parse")]
#[command(about = "Lexer and parser for `identifier = expression ;` statements", version)]
struct Cli {
    /// Подробный лог (debug) в stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Показать токены, недопустимые символы и статистику
    Lex {
        #[command(flatten)]
        input: Input,
    },

    /// Разобрать операторы и показать синтаксические деревья
    Parse {
        #[command(flatten)]
        input: Input,

        /// Показать также дерево разбора
        #[arg(long)]
        parse_tree: bool,
    },
}

#[derive(Args)]
struct Input {
    /// Исходная строка; без неё читается stdin
    source: Option<String>,

    /// Прочитать исходник из файла
    #[arg(short, long, conflicts_with = "source")]
    file: Option<PathBuf>,
}

impl Input {
    fn read(&self) -> Result<String, CliError> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }
        if let Some(path) = &self.file {
            return Ok(fs::read_to_string(path)?);
        }

        print!("Enter a line of code to lex: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_lexing(out: &mut impl Write, source: &str, output: &LexOutput) -> io::Result<()> {
    writeln!(out, "\nInput: {}\n", source)?;
    report::write_lexical_errors(out, &output.invalids)?;
    report::write_token_stream(out, &output.tokens)?;
    report::write_invalids(out, &output.invalids)?;
    report::write_counts(out, &output.counts())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Lex { input } => {
            let source = input.read()?;
            let output = parser::lex(&source);
            print_lexing(&mut out, &source, &output)?;

            Ok(if output.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Parse { input, parse_tree } => {
            let source = input.read()?;
            let output = parser::lex(&source);
            print_lexing(&mut out, &source, &output)?;

            let results = parser::parse_statements(&output)?;

            let mut all_ok = true;
            for (i, result) in results.iter().enumerate() {
                writeln!(out, "=== Statement {} ===", i + 1)?;
                match &result.outcome {
                    Ok(parsed) => {
                        writeln!(out, "Syntax tree:\n{}", parsed.syntax_tree)?;
                        if parse_tree {
                            writeln!(out, "Parse tree:\n{}", parsed.parse_tree)?;
                        }
                    }
                    Err(e) => {
                        all_ok = false;
                        writeln!(out, "{}\n", e)?;
                    }
                }
            }

            Ok(if all_ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
