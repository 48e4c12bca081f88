use clap::error::ErrorKind;
use clap::Parser;
use pricewarden::adapter::inbound::cli::command::{Cli, INVALID_ARGUMENTS};
use pricewarden::adapter::inbound::cli::{self, output};
use pricewarden::domain::Verdict;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            output::emit(&Verdict::error(INVALID_ARGUMENTS));
            return;
        }
    };

    cli::run(args).await;
}
