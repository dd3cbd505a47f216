use crate::config::Config;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// contactbook - personal address book with birthday reminders
#[derive(Debug, Parser)]
#[command(name = "contactbook")]
#[command(about = "Personal address book with birthday reminders", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address book file to use (overrides storage.data_file)
    #[arg(long = "data-file", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Print debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Configuration with command line overrides applied
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(data_file) = &self.data_file {
            config.storage.data_file = Some(data_file.clone());
        }
        Ok(config)
    }
}
