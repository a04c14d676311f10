use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let pdf_path = env::args()
        .nth(1)
        .ok_or("usage: cargo run --example client -- <guidelines.pdf>")?;
    let base_url = env::var("EXTRACTOR_URL").unwrap_or_else(|_| "http://127.0.0.1:5001".to_string());
    let client = Client::new();

    println!("📋 Health Check:");
    let health_response = client.get(format!("{}/health", base_url)).send().await?;
    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    println!("\n📄 Extracting guidelines from {}:", pdf_path);
    let bytes = tokio::fs::read(&pdf_path).await?;
    let filename = std::path::Path::new(&pdf_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document.pdf".to_string());

    let form = Form::new().part(
        "file",
        Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/pdf")?,
    );

    let response = client
        .post(format!("{}/extract-guidelines", base_url))
        .multipart(form)
        .send()
        .await?;

    println!("Status: {}", response.status());
    let body: serde_json::Value = response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
