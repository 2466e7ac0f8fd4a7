use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use stockbot_logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "stockbot", about = "Stock list form with a simulated bot run")]
pub struct Args {
    /// RON configuration file.
    #[arg(long, default_value = "stockbot.ron")]
    pub config: PathBuf,

    /// Prefilled stock list: a file path or an http(s) URL. Overrides the config file.
    #[arg(long)]
    pub prefilled: Option<String>,

    /// Where diagnostic logs go.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
