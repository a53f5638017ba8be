//! Amazon product scraping example.
//!
//! Triggers a dataset job for two products, waits for it and prints the records.
//!
//! Run with: `BRIGHTDATA_API_TOKEN=your-token cargo run --example amazon_products`

use brightdata::{Client, ScrapeOptions};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), brightdata::Error> {
    // RUST_LOG=brightdata=debug shows every poll
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let result = client
        .scrape()
        .amazon()
        .options(ScrapeOptions::default().timeout(Duration::from_secs(300)))
        .products(vec![
            "https://www.amazon.com/dp/B0CRMZHDG8",
            "https://www.amazon.com/dp/B07PGL2ZSL",
        ])
        .await?;

    if !result.success {
        println!("Scrape {:?}: {}", result.status, result.error.unwrap_or_default());
        return Ok(());
    }

    for record in result.records() {
        println!(
            "{} - {}",
            record["title"].as_str().unwrap_or("?"),
            record["final_price"]
        );
    }

    println!(
        "Rows: {}, est. cost: ${:.4}, polls: {}",
        result.row_count.unwrap_or(0),
        result.cost.unwrap_or(0.0),
        result.poll_count
    );
    if let Some(total) = result.total_duration() {
        println!("Took {:.1}s", total.num_milliseconds() as f64 / 1000.0);
    }

    Ok(())
}
