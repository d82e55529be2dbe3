//! css-typings: TypeScript typings for CSS modules.

mod cli;
mod logging;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    orchestrator::run(args).await?;
    Ok(())
}
