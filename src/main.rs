use anyhow::Result;
use std::process::ExitCode;

use gtools::cli::{App, Args, Config};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse_args();
    let config = Config::load(args.config.clone())?;

    App::new(config).run(args).await
}
