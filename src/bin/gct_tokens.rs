use anyhow::{Context, Result};
use clap::Parser;
use gct_lang::logging;
use gct_lang::Lexer;

use std::fs;
use std::path::PathBuf;

/// Prints every token of a .gct file, one per line.
#[derive(Parser, Debug)]
#[clap(name = "gct-tokens", version)]
struct Args {
    #[clap(parse(from_os_str))]
    file: PathBuf,
}

fn main() -> Result<()> {
    logging::init_tracing();
    let args = Args::parse();

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    println!("File size: {} bytes", source.len());

    let mut count = 0;
    for token in Lexer::new(&source).iter() {
        count += 1;
        println!(
            "{:>4} | Type: {:<10} | Literal: {:<15} | Line: {} | Column: {}",
            count,
            token.kind.name(),
            format!("{:?}", token.literal),
            token.position.line_no,
            token.position.column_no
        );
    }

    println!("Total tokens: {}", count);
    Ok(())
}
