use chess_client::{ApiClient, Config};
use rusty_chess::Session;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so they stay out of the page
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::info!("Using chess server at {}", config.api_url);

    let api = ApiClient::new(&config)?;
    let input = BufReader::new(tokio::io::stdin());

    Session::new(api, std::io::stdout()).run(input).await?;
    Ok(())
}
