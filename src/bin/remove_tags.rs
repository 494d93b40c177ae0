//! Removes the given tags from every order in the store.
//!
//! Enumerates all orders over the GraphQL cursor connection and strips the
//! requested tags one order at a time. Exits with status 1 on any fatal
//! setup error; per-order failures (including `userErrors`) are logged and
//! do not affect the exit status.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use order_tagger::tagging::remove_tags_from_all_orders;
use order_tagger::{AppConfig, Session};

#[derive(Debug, Parser)]
#[command(
    name = "remove-tags",
    about = "Remove tags from all Shopify orders"
)]
struct Args {
    /// Tag to remove; repeat for multiple tags.
    #[arg(long = "tag", required = true)]
    tags: Vec<String>,
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

    let summary = remove_tags_from_all_orders(&session, &config, &args.tags).await?;
    tracing::info!(
        updated = summary.updated,
        failed = summary.failed,
        "tag removal run finished"
    );

    Ok(())
}
