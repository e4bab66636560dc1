use std::process::ExitCode;

use clap::Parser;
use lectern_cli::{CliArgs, LecternCli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let cli = match LecternCli::from_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
