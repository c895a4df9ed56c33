mod cli;
mod client;
mod editor;
mod languages;
mod model;
mod session;
mod storage;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let code = cli::run(args).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
