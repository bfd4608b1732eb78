use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use gct_lang::config::{Config, DEFAULT_MODULE_DIR};
use gct_lang::logging;
use gct_lang::{Interpreter, InterpreterError, Object, Parser, ParserError};

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};

/// Runs a .gct script, or starts a REPL when no script is given.
#[derive(ClapParser, Debug)]
#[clap(name = "gct", version)]
struct Args {
    /// Script to run.
    #[clap(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Directory searched for imports that are not found relative to the
    /// working directory.
    #[clap(
        long,
        env = "GCT_MODULE_DIR",
        default_value = DEFAULT_MODULE_DIR,
        parse(from_os_str)
    )]
    module_dir: PathBuf,
}

enum RunError {
    Parse(Vec<ParserError>),
    Runtime(InterpreterError),
}

fn main() -> Result<()> {
    logging::init_tracing();
    let args = Args::parse();
    let config = Config::with_module_dir(args.module_dir);

    match args.script {
        Some(script) => run_file(&script, &config),
        None => run_prompt(&config),
    }
}

fn run_prompt(config: &Config) -> Result<()> {
    println!("gct {}", env!("CARGO_PKG_VERSION"));
    println!("Type in commands");

    let mut interpreter = Interpreter::with_config(config, io::stdout());
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!(">> ");
        io::stdout().flush().context("failed to flush stdout")?;

        input.clear();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .context("failed to read from stdin")?;
        if read == 0 {
            println!();
            return Ok(());
        }

        match run(&mut interpreter, &input) {
            Ok(value) => echo(&mut io::stdout(), &value)?,
            Err(RunError::Parse(errors)) => report_parser_errors(&mut io::stdout(), &errors)?,
            Err(RunError::Runtime(e)) => println!("ERROR: {}", e),
        }
    }
}

fn run_file(path: &Path, config: &Config) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let mut interpreter = Interpreter::with_config(config, io::stdout());

    match run(&mut interpreter, &contents) {
        Ok(value) => echo(&mut io::stdout(), &value)?,
        Err(RunError::Parse(errors)) => {
            report_parser_errors(&mut io::stderr(), &errors)?;
            process::exit(65);
        }
        Err(RunError::Runtime(e)) => {
            eprintln!("ERROR: {}", e);
            process::exit(70);
        }
    }

    Ok(())
}

fn run<W: Write>(interpreter: &mut Interpreter<W>, source: &str) -> Result<Object, RunError> {
    let (program, errors) = Parser::new(source).parse();
    if !errors.is_empty() {
        return Err(RunError::Parse(errors));
    }

    interpreter.eval_program(&program).map_err(RunError::Runtime)
}

/// Prints the value a program ended with, `null` included.
fn echo(out: &mut dyn Write, value: &Object) -> Result<()> {
    writeln!(out, "{}", value).context("failed to print result")
}

fn report_parser_errors(out: &mut dyn Write, errors: &[ParserError]) -> Result<()> {
    for error in errors.iter() {
        writeln!(out, "\t{}", error).context("failed to report parser errors")?;
    }
    Ok(())
}
