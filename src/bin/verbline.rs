// src/bin/verbline.rs

//! Command shell over the demo registry. See `verbline --help`.

use clap::Parser;
use colored::*;
use verbline::cli::{self, Cli};

fn main() {
    env_logger::init();

    if let Err(e) = cli::run(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
