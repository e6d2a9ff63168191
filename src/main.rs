use anyhow::Result;
use clap::{CommandFactory, Parser};
use spp_loadtest::cli;
use tracing::error;

fn main() -> Result<()> {
    if std::env::args_os().len() <= 1 {
        cli::Args::command().print_help()?;
        std::process::exit(2);
    }
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        if tracing::dispatcher::has_been_set() {
            error!("{:#}", err);
        } else {
            // failed before logging was initialized
            eprintln!("spp-loadtest: {:#}", err);
        }
        std::process::exit(1);
    }
    Ok(())
}
