use anyhow::Context;
use bottle_prep::cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("bottle-prep failed")
}
