//! `bindery` command-line tool.

use bindery_cli::{Cli, init_logging, run};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let output = run(&cli)?;
    println!("{}", output);
    Ok(())
}
