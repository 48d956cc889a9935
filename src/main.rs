use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;

use averon_catalog::catalog::{select_source, CatalogGateway, ProductSource, SeedSource};
use averon_catalog::cli::{Cli, Commands};
use averon_catalog::core::{config, init_logger, log_catalog_configuration};
use averon_catalog::telegram::PhotoResolver;
use averon_catalog::webapp::run_webapp_server;

/// Main entry point for the catalog service
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, server bind).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any Lazy
    // config static is touched
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;
    log_catalog_configuration();

    match cli.command {
        Some(Commands::Serve { port, seed, shuffle }) => {
            let port = port.unwrap_or(*config::WEB_PORT);
            run_server(port, seed, shuffle).await
        }
        Some(Commands::Dump { category }) => dump_catalog(category.as_deref()).await,
        None => run_server(*config::WEB_PORT, false, false).await,
    }
}

fn build_gateway(seed: bool, shuffle: bool) -> CatalogGateway {
    let client = reqwest::Client::new();
    let resolver = Arc::new(PhotoResolver::new(client.clone(), config::BOT_TOKEN.as_str()));

    let source: Box<dyn ProductSource> = if seed {
        Box::new(SeedSource)
    } else {
        select_source(client)
    };

    CatalogGateway::new(source, resolver).with_shuffle(shuffle)
}

async fn run_server(port: u16, seed: bool, shuffle: bool) -> Result<()> {
    let gateway = Arc::new(build_gateway(seed, shuffle));
    run_webapp_server(port, gateway).await
}

/// Print the fully resolved catalog as JSON, for eyeballing what the
/// storefront would actually receive.
async fn dump_catalog(category: Option<&str>) -> Result<()> {
    let gateway = build_gateway(false, false);
    let products = gateway.list_products(category).await;
    log::info!("Dumping {} products", products.len());
    println!("{}", serde_json::to_string_pretty(&products)?);
    Ok(())
}
