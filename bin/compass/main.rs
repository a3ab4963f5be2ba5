//! SWE-Compass harness CLI
//!
//! `compass images` turns a dataset JSONL into an image list, and
//! `compass pull` fetches that list into the local Docker daemon.

mod commands;
mod style;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use swe_compass::dataset::FILTER_ALL;
use swe_compass::{HarnessConfig, PullOverrides};
use tracing_subscriber::EnvFilter;

use commands::images::ImagesArgs;

#[derive(Parser, Debug)]
#[command(name = "compass", version)]
#[command(about = "SWE-Compass evaluation harness")]
struct Cli {
    /// Config file (defaults to ./compass.toml when present)
    #[arg(short, long, global = true, env = "COMPASS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pull every image in a list that is not already present locally
    Pull {
        /// Image list, one reference per line
        #[arg(short, long, env = "COMPASS_IMAGE_LIST")]
        list: Option<PathBuf>,

        /// Maximum concurrent pulls
        #[arg(short = 'j', long, env = "COMPASS_MAX_CONCURRENT")]
        max_concurrent: Option<usize>,

        /// Per-image pull timeout in seconds (0 disables)
        #[arg(long, env = "COMPASS_FETCH_TIMEOUT")]
        timeout_secs: Option<u64>,

        /// Exit with status 1 when any pull failed (`--fail-on-error false` turns
        /// off a config file setting)
        #[arg(
            long,
            env = "COMPASS_FAIL_ON_ERROR",
            action = ArgAction::Set,
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        fail_on_error: Option<bool>,
    },

    /// Build an image list from a dataset JSONL
    Images {
        /// Dataset JSONL
        #[arg(short, long)]
        dataset: PathBuf,

        /// Output image list
        #[arg(short, long, default_value = "images.txt")]
        output: PathBuf,

        /// Comma-separated task types, or ALL
        #[arg(long, default_value = FILTER_ALL)]
        task_types: String,

        /// Comma-separated languages, or ALL
        #[arg(long, default_value = FILTER_ALL)]
        programming_languages: String,

        /// Comma-separated scenarios, or ALL
        #[arg(long, default_value = FILTER_ALL)]
        programming_scenarios: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,swe_compass=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = HarnessConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Pull {
            list,
            max_concurrent,
            timeout_secs,
            fail_on_error,
        } => {
            let overrides = PullOverrides {
                image_list: list,
                max_concurrent,
                fetch_timeout_secs: timeout_secs,
                fail_on_error,
            };
            let (summary, fail_on_error) = commands::pull::run(config, overrides).await?;
            let code = summary.exit_code(fail_on_error);
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Images {
            dataset,
            output,
            task_types,
            programming_languages,
            programming_scenarios,
        } => commands::images::run(ImagesArgs {
            dataset,
            output,
            task_types,
            programming_languages,
            programming_scenarios,
        })?,
    }

    Ok(())
}
