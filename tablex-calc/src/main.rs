//! Command-line interface for the calculator.
//!
//! With an argument, evaluates it and prints the result; without one, reads
//! expressions from standard input, one per line.

use anyhow::Result;
use clap::Parser as ClapParser;
use std::io::BufRead;

#[derive(ClapParser, Debug)]
#[command(version, about = "Evaluate arithmetic expressions", long_about = None)]
struct Args {
    /// Expression to evaluate; reads standard input when omitted.
    expression: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.expression {
        Some(expression) => {
            println!("{}", tablex_calc::eval_str(&expression)?);
        }
        None => {
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match tablex_calc::eval_str(&line) {
                    Ok(value) => println!("{value}"),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
        }
    }
    Ok(())
}
