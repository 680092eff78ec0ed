//! instance-inventory: EC2 instance inventory across regions
//!
//! Collects every instance visible in the configured regions, orders each
//! region by launch time, and persists per-region JSON artifacts.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use instance_inventory::config::{self, InventoryConfig, RefreshScope};
use instance_inventory::inventory::{AwsClientFactory, Inventory};
use instance_inventory::region::{self, RegionKey};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "instance-inventory")]
#[command(about = "EC2 instance inventory ordered by launch time")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the comma-separated region list file
    #[arg(long, env = "INVENTORY_REGIONS_FILE", default_value = config::DEFAULT_REGIONS_FILE)]
    regions_file: PathBuf,

    /// Artifact path template; <region> is replaced by the region name
    #[arg(long, env = "INVENTORY_OUTPUT_TEMPLATE", default_value = config::DEFAULT_OUTPUT_TEMPLATE)]
    output_template: String,

    /// Scope of the refresh triggered by a cache miss
    #[arg(long, value_enum, default_value_t = RefreshScopeArg::AllRegions)]
    refresh_scope: RefreshScopeArg,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect every configured region and write the artifacts
    Collect {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print one region's instances sorted by launch time
    Show {
        #[command(flatten)]
        common: CommonArgs,

        /// Region to show
        #[arg(long)]
        region: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RefreshScopeArg {
    /// Refresh every configured region on a miss
    AllRegions,
    /// Refresh only the region that missed
    MissedRegion,
}

impl From<RefreshScopeArg> for RefreshScope {
    fn from(arg: RefreshScopeArg) -> Self {
        match arg {
            RefreshScopeArg::AllRegions => RefreshScope::AllRegions,
            RefreshScopeArg::MissedRegion => RefreshScope::MissedRegion,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    } else {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\n\x1b[2mBacktrace:\x1b[0m\n{backtrace}");
        }
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Collect { common } => {
            let inventory = build_inventory(&common)?;
            let total = inventory.config().regions.len();

            let summary = inventory.bootstrap().await;
            info!(
                collected = summary.collected,
                failed = summary.failed,
                "Collection pass complete"
            );

            if summary.failed > 0 {
                anyhow::bail!("{} of {total} regions failed to collect", summary.failed);
            }
        }

        Command::Show { common, region } => {
            let region = RegionKey::parse(&region)?;
            let inventory = build_inventory(&common)?;

            match inventory.sorted_instances(&region).await {
                Some(records) => println!("{}", serde_json::to_string_pretty(&*records)?),
                None => anyhow::bail!("No inventory for region {region}"),
            }
        }
    }

    Ok(())
}

fn build_inventory(common: &CommonArgs) -> Result<Inventory<AwsClientFactory>> {
    config::validate_credentials()?;

    let regions = region::load_regions(&common.regions_file)?;
    info!(
        regions = regions.len(),
        file = %common.regions_file.display(),
        "Loaded region list"
    );

    let config = InventoryConfig {
        regions,
        output_template: common.output_template.clone(),
        refresh_scope: common.refresh_scope.into(),
    };

    Ok(Inventory::new(config, AwsClientFactory))
}
