//! slnsync CLI entry point
//!
//! Usage: slnsync <COMMAND>
//!
//! Commands:
//!   generate  Run a full generation pass
//!   sync      Regenerate only if any touched file is relevant

use anyhow::Result;
use clap::Parser;

use slnsync::cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}
