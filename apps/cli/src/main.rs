//! mdparts CLI — merge numbered chapter directories into single documents.
//!
//! Every immediate subdirectory whose name starts with two digits gets a
//! `part_<prefix>.md` built from its markdown files.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
