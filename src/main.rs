//! Falcon-Crawl main entry point
//!
//! The binary takes no flags: behavior is driven entirely by
//! `config/pipeline.json`, discovered by walking upward from the current
//! directory. Logging verbosity is controlled through `RUST_LOG`.

use falcon_crawl::config::load_config;
use falcon_crawl::Crawler;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let start_dir = std::env::current_dir()?;
    let config = load_config(&start_dir)?;
    tracing::info!(
        "Seed {} | domains {:?} | output {}",
        config.start_url,
        config.allowed_domains,
        config.raw_output.display()
    );

    let crawler = Crawler::new(config)?;
    crawler.run();
    Ok(())
}

/// Sets up the tracing subscriber on standard error
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("falcon_crawl=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
