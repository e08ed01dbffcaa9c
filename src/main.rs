use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use paperscout::config::CONFIG;
use paperscout::controller::{OutcomeEnvelope, SearchController};
use paperscout::search_client::SearchClient;
use paperscout::view::{self, ViewOptions};
use paperscout::year_filter::YearRange;

/// Terminal client for the semantic paper search API.
#[derive(Parser, Debug)]
#[command(name = "paperscout", version)]
struct Cli {
    /// One-shot query; omit to start an interactive session
    query: Option<String>,

    /// Search endpoint, e.g. http://localhost:5000
    #[arg(long)]
    endpoint: Option<String>,

    /// Client-side deadline per request, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Show the key terms returned with the results
    #[arg(long)]
    show_key_terms: bool,

    /// Only show results published in or after this year
    #[arg(long)]
    from_year: Option<i32>,

    /// Only show results published in or before this year
    #[arg(long)]
    to_year: Option<i32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let endpoint = cli
        .endpoint
        .unwrap_or_else(|| CONFIG.search_endpoint.clone());
    let timeout = Duration::from_millis(cli.timeout_ms.unwrap_or(CONFIG.search_timeout_ms));

    let year_range = match (cli.from_year, cli.to_year) {
        (None, None) => None,
        (from, to) => {
            let mut range = YearRange::all();
            if let Some(from) = from {
                range.set_min(from);
            }
            if let Some(to) = to {
                range.set_max(to);
            }
            Some(range)
        }
    };

    let options = ViewOptions {
        endpoint: endpoint.clone(),
        show_key_terms: cli.show_key_terms,
        year_range,
    };

    let client = SearchClient::new(endpoint);
    let (mut controller, mut outcomes) = SearchController::new(Arc::new(client), timeout);

    match cli.query {
        Some(query) => run_once(&mut controller, &mut outcomes, &options, &query).await,
        None => run_interactive(&mut controller, &mut outcomes, &options).await,
    }
}

async fn run_once(
    controller: &mut SearchController,
    outcomes: &mut mpsc::UnboundedReceiver<OutcomeEnvelope>,
    options: &ViewOptions,
    query: &str,
) -> anyhow::Result<()> {
    if !controller.submit(query) {
        bail!("query cannot be empty");
    }
    while let Some(envelope) = outcomes.recv().await {
        if controller.apply(envelope) {
            println!("{}", view::render(controller.state(), options));
            break;
        }
    }
    controller.shutdown();
    Ok(())
}

async fn run_interactive(
    controller: &mut SearchController,
    outcomes: &mut mpsc::UnboundedReceiver<OutcomeEnvelope>,
    options: &ViewOptions,
) -> anyhow::Result<()> {
    println!("{}", view::render(controller.state(), options));
    println!("Type a query and press Enter. Type \"quit\" to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    None => break, // stdin closed
                    Some(line) if line.trim() == "quit" => break,
                    Some(line) => {
                        if controller.submit(&line) {
                            println!("{}", view::render(controller.state(), options));
                        }
                    }
                }
            }
            Some(envelope) = outcomes.recv() => {
                if controller.apply(envelope) {
                    println!("{}", view::render(controller.state(), options));
                }
            }
        }
    }

    controller.shutdown();
    Ok(())
}
