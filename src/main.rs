mod chart;
mod cli;
mod export;
mod histogram;
mod loader;
mod logging;
mod metrics;
mod model;
mod text_summary;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init_logging(args.verbose);

    // Missing or empty input still ends in Ok(()); only real failures exit non-zero.
    cli::run(args)
}
