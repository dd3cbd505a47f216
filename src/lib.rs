pub mod address_book;
pub mod app;
pub mod cli;
pub mod command_processor;
pub mod completion;
pub mod config;
pub mod storage;

use anyhow::Result;
use env_logger::Env;
use log::{LevelFilter, info};

pub fn run(cli: cli::Cli) -> Result<()> {
    let config = cli.load_config()?;
    let state = storage::StateManager::new(&config)?;
    info!("Using address book at {}", state.path().display());
    let app = app::Application::new(&config, state)?;
    app.run()
}

/// Logs go to stderr. `RUST_LOG` sets the filter, `verbose` forces debug.
pub fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

// Re-export commonly used types
pub use address_book::{AddressBook, BirthdayReport, BookError, Record};
pub use config::Config;
