//! ptsim - Page Table Simulator
//!
//! Usage: ptsim [OPTIONS] [COMMANDS]...
//!
//! Commands, consumed left to right:
//!   np <proc> <pages>     create a process with <pages> data pages
//!   pfm                   print the free page map
//!   ppt <proc>            print a process page table
//!   kp <proc>             kill a process
//!   sb <proc> <va> <val>  store a byte at a virtual address
//!   lb <proc> <va>        load a byte from a virtual address

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};

use page_table_sim::io::{parse_commands, read_commands};
use page_table_sim::Simulator;

#[derive(Parser)]
#[command(name = "ptsim")]
#[command(about = "Single-level page table simulator")]
struct Cli {
    /// Log allocations, teardown and translations to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Read commands from a script file before the command-line ones
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Commands to run, e.g. `np 1 2 pfm ppt 1`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    commands: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    if cli.file.is_none() && cli.commands.is_empty() {
        eprintln!("usage: ptsim commands");
        process::exit(1);
    }

    let mut commands = match &cli.file {
        Some(path) => read_commands(path)?,
        None => Vec::new(),
    };
    commands.extend(parse_commands(&cli.commands)?);
    debug!("running {} commands", commands.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut sim = Simulator::new();
    sim.run(&commands, &mut out).context("failed to write simulator output")?;
    out.flush()?;

    Ok(())
}
