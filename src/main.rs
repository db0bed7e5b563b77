use anyhow::Context;
use clap::Parser;
use recipes_api::utils::logger;
use recipes_api::{AppConfig, CliArgs, RecipeServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_logger(args.verbose, args.log_format);

    tracing::info!("Starting recipes-api");

    let config = match AppConfig::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(
        "Storage: {:?}, database: {}, request timeout: {:?}",
        config.storage,
        config.database_name,
        config.request_timeout
    );

    let server = RecipeServer::build(&config)
        .await
        .context("failed to start recipes-api")?;

    server.run().await.context("server error")?;

    Ok(())
}
