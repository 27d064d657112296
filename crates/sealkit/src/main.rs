use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    sealkit::cli::run(sealkit::cli::Cli::parse()).await
}
