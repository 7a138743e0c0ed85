//! pricematch HTTP server binary.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A local .env may carry the embedding API key.
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    server::start_server(config).await?;

    Ok(())
}
