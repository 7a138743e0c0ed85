use std::{env, error::Error};

use semantic::{ApiProvider, EmbeddingClient, EmbeddingConfig, EmbeddingRole};

/// Embeds the given descriptions and prints the first components of each vector.
///
/// With `PRICEMATCH_API_KEY` set, calls Cohere `embed-v4.0`; otherwise falls
/// back to the offline stub provider.
///
/// ```bash
/// PRICEMATCH_API_KEY=co-xxx cargo run -p pricematch-semantic --example embed -- \
///     "steel rebar 12mm" "cement opc 53 grade"
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let texts: Vec<String> = env::args().skip(1).collect();
    if texts.is_empty() {
        eprintln!("usage: embed <text> [<text> ...]");
        return Ok(());
    }

    let cfg = match env::var("PRICEMATCH_API_KEY") {
        Ok(key) => EmbeddingConfig {
            provider: ApiProvider::Cohere,
            api_key: Some(key),
            ..Default::default()
        },
        Err(_) => EmbeddingConfig::stub(16),
    };

    let client = EmbeddingClient::from_config(&cfg)?;
    let vectors = client.embed(&texts, EmbeddingRole::Query).await?;
    for (text, vector) in texts.iter().zip(&vectors) {
        let preview: Vec<String> = vector.iter().take(4).map(|x| format!("{x:.4}")).collect();
        println!("{text:<32} dim={} [{} ...]", vector.len(), preview.join(", "));
    }
    Ok(())
}
