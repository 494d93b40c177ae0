//! Tags every untagged order by its shipping country.
//!
//! Reads `TOKEN` and `MERCHANT` from the environment (a `.env` file is
//! loaded first when present), loads the country mapping CSV, and runs the
//! tagging pipeline. Exits with status 1 on any fatal setup error;
//! per-order failures are logged and do not affect the exit status.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use order_tagger::tagging::{
    tag_untagged_orders, CountryMapping, CountryNames, TagSource,
};
use order_tagger::{AppConfig, Session};

/// Default mapping file for the category variant.
const CATEGORY_MAPPING_PATH: &str = "00i_country_mappings.csv";

/// Default mapping file for the country-name variant.
const COUNTRY_NAMES_PATH: &str = "country_codes.csv";

#[derive(Debug, Parser)]
#[command(
    name = "tag-orders",
    about = "Tag untagged Shopify orders by shipping country"
)]
struct Args {
    /// Path to the mapping CSV; defaults depend on the variant.
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Tag with country display names (alpha-2/name CSV) instead of the
    /// to_customer/to_dragon categories.
    #[arg(long)]
    country_names: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = AppConfig::from_env().context("failed to resolve configuration")?;
    let session = Session::new(&config);

    let source = if args.country_names {
        let path = args
            .mapping
            .unwrap_or_else(|| PathBuf::from(COUNTRY_NAMES_PATH));
        let names = CountryNames::load(&path)
            .with_context(|| format!("failed to load country names from {}", path.display()))?;
        TagSource::Names(names)
    } else {
        let path = args
            .mapping
            .unwrap_or_else(|| PathBuf::from(CATEGORY_MAPPING_PATH));
        let mapping = CountryMapping::load(&path)
            .with_context(|| format!("failed to load country mapping from {}", path.display()))?;
        TagSource::Categories(mapping)
    };

    let summary = tag_untagged_orders(&session, &config, &source).await?;
    tracing::info!(
        updated = summary.updated,
        skipped = summary.skipped,
        failed = summary.failed,
        "tagging run finished"
    );

    Ok(())
}
