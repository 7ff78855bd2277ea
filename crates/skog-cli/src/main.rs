mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "skog")]
#[command(about = "Spar storefront product scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the storefront and write one JSON record per product.
    Scrape {
        /// Storefront root page (overrides `SKOG_ROOT_URI`).
        #[arg(long)]
        root: Option<String>,
        /// Listing markup layout (overrides `SKOG_FEED_LAYOUT`).
        #[arg(long)]
        layout: Option<String>,
        /// Response cache directory (overrides `SKOG_CACHE_DIR`).
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        /// Output file for JSON lines; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Download one product image.
    Image {
        uri: String,
        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = skog_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape {
            root,
            layout,
            cache_dir,
            out,
        } => {
            if let Some(root) = root {
                config.root_uri = root;
            }
            if let Some(layout) = layout {
                config.feed_layout = layout;
            }
            if cache_dir.is_some() {
                config.cache_dir = cache_dir;
            }
            let summary = scrape::run_scrape(&config, out.as_deref()).await?;
            eprintln!("{summary}");
        }
        Commands::Image { uri, out } => scrape::run_image(&config, &uri, &out).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
