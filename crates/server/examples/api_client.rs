//! Calls a running pricematch server.
//!
//! Start one with the stub provider first:
//! `PRICEMATCH_SERVER__USE_STUB_PROVIDER=true cargo run -p pricematch-server`

use reqwest::Client;
use serde_json::json;

const SERVER_URL: &str = "http://localhost:8080";
const API_KEY: &str = "demo-key-12345";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();

    println!("1. Health Check:");
    let resp = client.get(format!("{SERVER_URL}/health")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    println!("2. Match inquiry rows:");
    let resp = client
        .post(format!("{SERVER_URL}/api/v1/match"))
        .header("X-API-Key", API_KEY)
        .json(&json!({
            "references": [
                { "code": "ST-12", "description": "Steel Rebar 12mm", "unit": "kg", "rate": 500 },
                { "code": "CM-53", "description": "Cement OPC 53 Grade", "unit": "bag", "rate": "350.00" }
            ],
            "inquiries": [
                { "target": "B-12", "description": "Steel Rebar 12mm.", "quantity": 40 },
                { "target": "B-13", "description": "OPC cement 53 grade", "quantity": 120 }
            ],
            "top_k": 2
        }))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    println!("3. Server metadata:");
    let resp = client
        .get(format!("{SERVER_URL}/api/v1/metadata"))
        .header("Authorization", format!("Bearer {API_KEY}"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);

    Ok(())
}
