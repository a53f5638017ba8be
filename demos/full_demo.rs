//! Full SDK Demo - walks through account, search, unlocker and dataset scrapers
//!
//! Run with: BRIGHTDATA_API_TOKEN=your-token cargo run --example full_demo

use brightdata::{
    platform, ChatGptPrompt, Client, JobSearch, ResponseFormat, ScrapeOptions, ScrapeResult,
    SerpOptions, UnlockerOptions, SDK_VERSION,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const PRODUCT_URL: &str = "https://www.amazon.com/dp/B0CRMZHDG8";
const PROFILE_URL: &str = "https://www.linkedin.com/in/satyanadella";

fn header(text: &str) {
    println!();
    println!("{}", format!(" {} ", text).on_blue().bold());
    println!();
}

fn subheader(text: &str) {
    println!("{} {}", "▸".blue().bold(), text.bold().blue());
}

fn info(label: &str, value: &str) {
    println!("  {}: {}", label.dimmed(), value);
}

fn success(text: &str) {
    println!("{} {}", "✔".green(), text);
}

fn warn(text: &str) {
    println!("{} {}", "⚠".yellow(), text);
}

fn error(text: &str) {
    println!("{} {}", "✖".red(), text);
}

fn print_json(value: &Value, max_chars: usize) {
    let formatted = serde_json::to_string_pretty(value).unwrap_or_default();
    let shown: String = formatted.chars().take(max_chars).collect();
    println!("{}", shown.dimmed());
    if formatted.len() > shown.len() {
        println!("{}", "  ...".dimmed());
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn report(result: &ScrapeResult) {
    if result.success {
        success(&format!(
            "{:?} - {} row(s)",
            result.status,
            result.row_count.unwrap_or(0)
        ));
        if let Some(snapshot) = &result.snapshot_id {
            info("Snapshot", snapshot);
        }
        if let Some(cost) = result.cost {
            info("Est. cost", &format!("${:.4}", cost));
        }
        if let Some(data) = &result.data {
            print_json(data, 600);
        }
    } else {
        error(&format!(
            "{:?}: {}",
            result.status,
            result.error.as_deref().unwrap_or("unknown error")
        ));
    }
}

#[tokio::main]
async fn main() -> Result<(), brightdata::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brightdata=warn")),
        )
        .init();

    // Banner
    println!();
    println!(
        "{}",
        "╔═══════════════════════════════════════════════════════════╗"
            .magenta()
            .bold()
    );
    println!(
        "{}{}{}",
        "║".magenta().bold(),
        "          Bright Data Rust SDK - Full Demo                 ".bold(),
        "║".magenta().bold()
    );
    println!(
        "{}",
        "╚═══════════════════════════════════════════════════════════╝"
            .magenta()
            .bold()
    );

    // ========== Configuration ==========
    header("Configuration");

    let client = Client::from_env()?;
    subheader("SDK Information");
    info("SDK Version", SDK_VERSION);
    info("Base URL", client.base_url());
    info("Token", &client.masked_token());

    subheader("Registered dataset operations");
    for config in platform::REGISTRY {
        info(
            &config.key(),
            &format!(
                "{} (min wait {}s)",
                config.dataset_id,
                config.min_poll_timeout.as_secs()
            ),
        );
    }

    // ========== Account ==========
    header("Account");

    let pb = spinner("Checking connection...");
    let connected = client.test_connection().await?;
    pb.finish_and_clear();
    if !connected {
        error("Token rejected; check BRIGHTDATA_API_TOKEN");
        return Ok(());
    }
    success("Connected");

    let account = client.get_account_info().await?;
    info("Active zones", &account.zone_count.to_string());
    for zone in &account.zones {
        info("  zone", &format!("{} ({})", zone.name, zone.zone_type.as_deref().unwrap_or("-")));
    }

    // ========== Search ==========
    header("Search");

    subheader("Google");
    let pb = spinner("Searching Google...");
    let serp = client
        .search()
        .google(
            "rust async runtime",
            &SerpOptions::default().country("us").num_results(5),
        )
        .await?;
    pb.finish_and_clear();
    report(&serp);

    subheader("Bing + Yandex batch");
    let pb = spinner("Searching...");
    let batch = client
        .search()
        .bing_many(&["tokio", "reqwest"], &SerpOptions::default())
        .await?;
    pb.finish_and_clear();
    for result in &batch {
        info("query", result.url.as_deref().unwrap_or("-"));
        report(result);
    }

    // ========== Web Unlocker ==========
    header("Web Unlocker");

    let pb = spinner("Fetching https://httpbin.org/json ...");
    let page = client
        .scrape()
        .url(
            "https://httpbin.org/json",
            &UnlockerOptions {
                format: ResponseFormat::Json,
                ..Default::default()
            },
        )
        .await?;
    pb.finish_and_clear();
    report(&page);

    // ========== Dataset scrapers ==========
    header("Dataset scrapers");

    let options = ScrapeOptions::default().poll_interval(Duration::from_secs(5));

    subheader("Amazon product");
    let pb = spinner("Waiting for snapshot...");
    let product = client
        .scrape()
        .amazon()
        .options(options.clone())
        .products(PRODUCT_URL)
        .await?;
    pb.finish_and_clear();
    report(&product);
    if let Some(latency) = product.trigger_latency() {
        info("Trigger latency", &format!("{}ms", latency.num_milliseconds()));
    }

    subheader("LinkedIn profile");
    let pb = spinner("Waiting for snapshot...");
    let profile = client
        .scrape()
        .linkedin()
        .options(options.clone())
        .profiles(PROFILE_URL)
        .await?;
    pb.finish_and_clear();
    report(&profile);

    subheader("LinkedIn job discovery");
    let pb = spinner("Waiting for snapshot...");
    let jobs = client
        .search()
        .linkedin()
        .options(options.clone())
        .jobs(&JobSearch::keyword("rust engineer").location("Berlin").remote(true))
        .await?;
    pb.finish_and_clear();
    report(&jobs);

    subheader("ChatGPT");
    let pb = spinner("Waiting for answer...");
    let answer = client
        .scrape()
        .chatgpt()
        .options(options)
        .prompt(ChatGptPrompt::new("Summarise what the tokio crate does in one sentence."))
        .await?;
    pb.finish_and_clear();
    match answer.data.as_ref().and_then(|d| d["answer"].as_str()) {
        Some(text) => success(text),
        None => warn("No answer text in the response"),
    }

    println!();
    success("Demo complete");
    Ok(())
}
