use anyhow::Result;
use clap::Parser;
use contactbook::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    contactbook::init_logger(cli.verbose);
    contactbook::run(cli)
}
