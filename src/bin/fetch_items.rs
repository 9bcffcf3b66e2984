//! Catalog refresh tool
//!
//! Downloads the vendor item feed for the latest (or a requested) patch,
//! runs it through the filter pipeline, and writes one playable catalog
//! file per locale. Run after each game patch to refresh the snapshots.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rift_quiz::catalog::feed::{build_catalog, fetch_feed, fetch_latest_patch};

#[derive(Parser, Debug)]
#[command(name = "fetch-items", about = "Refresh the playable item catalogs from the vendor feed")]
struct Args {
    /// Directory the catalog files are written to
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Locales to fetch, e.g. en_US fr_FR
    #[arg(long, num_args = 1.., default_values_t = vec!["en_US".to_string(), "fr_FR".to_string()])]
    locales: Vec<String>,

    /// Patch to fetch instead of the latest
    #[arg(long)]
    patch: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let client = reqwest::Client::new();

    let patch = match args.patch {
        Some(patch) => patch,
        None => fetch_latest_patch(&client)
            .await
            .context("could not determine the latest patch")?,
    };
    info!("Fetching patch {}", patch);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;

    for locale in &args.locales {
        let doc = fetch_feed(&client, &patch, locale)
            .await
            .with_context(|| format!("feed download failed for {locale}"))?;
        let catalog = build_catalog(&doc)
            .with_context(|| format!("feed for {locale} produced no playable catalog"))?;

        // Short locale prefix in the filename, items_en.json style
        let short = locale.split('_').next().unwrap_or(locale);
        let path = args.out_dir.join(format!("items_{short}.json"));
        catalog
            .save(&path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("{}: {} items -> {}", locale, catalog.len(), path.display());
    }

    Ok(())
}
