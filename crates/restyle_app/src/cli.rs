use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::logging::LogDestination;

/// Command-line front end for the restyle service.
#[derive(Debug, Parser)]
#[command(name = "restyle")]
#[command(
    about = "Send a page URL and a topic to the restyle service and save what it returns",
    long_about = None
)]
pub struct Cli {
    /// Page whose look should be recreated.
    pub input_url: Option<String>,

    /// Topic the recreated page should be about.
    pub topic: Option<String>,

    /// Base URL of the service. Overrides RESTYLE_API_URL and NEXT_PUBLIC_API_URL.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory downloaded files are saved to.
    #[arg(long, value_name = "DIR", default_value = "downloads")]
    pub output_dir: PathBuf,

    /// Fetch the response's download_url again once the request succeeds.
    #[arg(long)]
    pub download_again: bool,

    /// Log more; repeat for debug output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to ./restyle.log.
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }
}
