use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webapp::cli::{App, Cli};
use webapp::config::Config;
use webapp::rest_client::RestClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting webapp v{}", env!("CARGO_PKG_VERSION"));

    // One client per process, shared by every entity service
    let client = RestClient::new(config.api_base_url.clone(), config.request_timeout());
    info!("REST client initialized (endpoint: {})", client.base_url());

    let app = App::new(client);
    let output = app.run(cli.entity).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
