use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use giphy_contract::config::DEFAULT_PROPERTIES_PATH;
use giphy_contract::suite::Group;

/// Contract checks against the GIPHY HTTP API
#[derive(Parser)]
#[command(name = "giphy-contract")]
#[command(version, about = "Runs black-box contract checks against the GIPHY API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct Sources {
    /// Harness settings (TOML). Defaults to ./giphy-contract.toml if present
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Properties file holding `api_key` ($GIPHY_API_KEY takes precedence)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROPERTIES_PATH)]
    pub properties: PathBuf,

    /// Override the API base url
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run contract cases and print a report
    Run {
        #[command(flatten)]
        sources: Sources,

        /// Only cases in this group (gifs, stickers, trending)
        #[arg(short, long)]
        group: Option<Group>,

        /// Only cases whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Cases in flight at once
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,

        /// Also run cases registered as ignored
        #[arg(long)]
        include_ignored: bool,
    },
    /// List the contract cases
    List {
        /// Only cases in this group
        #[arg(short, long)]
        group: Option<Group>,
    },
    /// Load settings and credential, then report what would be used
    CheckConfig {
        #[command(flatten)]
        sources: Sources,
    },
}
