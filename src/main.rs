mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, Sources};
use giphy_contract::config::{Credentials, HarnessConfig};
use giphy_contract::suite::{self, RunOptions, Stability};
use giphy_contract::Harness;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("giphy_contract=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { sources, group, filter, jobs, include_ignored } => {
            let harness = build_harness(&sources)?;
            let cases = suite::select(group, filter.as_deref());
            if cases.is_empty() {
                anyhow::bail!("no cases match the given group/filter");
            }
            let report = suite::run(&harness, &cases, &RunOptions { jobs, include_ignored }).await;
            println!("{}", report);
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Commands::List { group } => {
            for case in suite::select(group, None) {
                let mut tags = Vec::new();
                if case.stability == Stability::Flaky { tags.push("flaky".to_string()); }
                if let Some(reason) = case.ignored { tags.push(format!("ignored: {}", reason)); }
                let tags = if tags.is_empty() { String::new() } else { format!("  [{}]", tags.join(", ")) };
                println!("{}::{}{}", case.group, case.name, tags);
            }
        }
        Commands::CheckConfig { sources } => {
            let harness = build_harness(&sources)?;
            let cfg = harness.config();
            println!("base_url        {}", cfg.base_url);
            println!("auth_contract   {:?}", cfg.auth_contract);
            println!("limit_ceiling   {}", cfg.limit_ceiling);
            println!("known_gif_id    {} ({})", cfg.known_gif_id, cfg.known_gif_rating);
            println!("api_key         loaded");
        }
    }
    Ok(())
}

fn build_harness(sources: &Sources) -> Result<Harness> {
    let mut config = HarnessConfig::load(sources.config.as_deref()).context("loading harness settings")?;
    if let Some(url) = sources.base_url.as_deref() {
        config = config.with_base_url(url)?;
    }
    let credentials = Credentials::load(&sources.properties)
        .with_context(|| format!("no usable credential; add `api_key=...` to {}", sources.properties.display()))?;
    Ok(Harness::new(config, credentials)?)
}
