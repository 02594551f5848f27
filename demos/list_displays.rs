use serde::Deserialize;
use signage_http::{ClientOptions, RequestDescriptor, ResilientClient};

#[derive(Debug, Deserialize)]
struct Display {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = ResilientClient::from_env()?.with_options(ClientOptions {
        max_retries: 2,
        retry_backoff_ms: 1_000,
        ..ClientOptions::default()
    });

    let displays: Vec<Display> = api.get_json("/displays").await?;
    for display in &displays {
        println!("{} {}", display.id, display.name);
    }

    let response = api
        .issue(&RequestDescriptor::get("/advertisements").header("accept", "application/json"))
        .await?;
    println!("advertisements: {} bytes", response.body.len());

    Ok(())
}
