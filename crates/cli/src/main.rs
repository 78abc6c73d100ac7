use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use waymark_core::Intent;
use waymark_observability::{init_tracing, AppMetrics};
use waymark_pipeline::{PipelineConfig, TripPipeline};
use waymark_resolve::Resolver;
use waymark_tagger::TaggerStack;

const DEMO_QUERIES: &[&str] = &[
    "Plan a trip from Dallas to Austin with a stop at a Walmart and a coffee shop.",
    "Navigate from New York to Philadelphia and avoid highways, stop at a gas station and pharmacy.",
    "Drive from San Francisco to Napa Valley with scenic views and a night stay in Sonoma.",
    "Plan a long road trip from New York to Los Angeles with rest stops every 300 miles and a night stay in Chicago and Denver.",
    "Find the shortest route from my house to the airport with a quick stop at a nearby ATM.",
    "Show me a scenic drive from San Francisco to Yosemite National Park with a stop at a famous viewpoint.",
    "Navigate from Dallas to Austin avoiding tolls and highways, prefer fuel-efficient route with EV charging every 150 miles.",
    "I need to urgently reach a hospital from my office due to heavy snow and avoid traffic.",
    "Plan a trip from Seattle to Portland, include scenic views, parking availability near downtown, and rest stops every 100 miles.",
];

#[derive(Debug, Parser)]
#[command(name = "waymark")]
#[command(about = "Waymark trip query CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Plan { query: String },
    Analyze { query: String },
    Demo,
    Intents,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("waymark_cli");
    let cli = Cli::parse();

    let pipeline = build_pipeline()?;

    match cli.command {
        Command::Plan { query } => {
            let result = pipeline.run(&query).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Analyze { query } => {
            let analysis = pipeline.analyze(&query);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Command::Demo => {
            for query in DEMO_QUERIES {
                let result = pipeline.run(query).await;
                println!("Query: {query}");
                println!("{}", serde_json::to_string_pretty(&result)?);
                println!();
            }
        }
        Command::Intents => {
            for intent in Intent::ALL {
                println!("{}", intent.label());
            }
        }
    }

    Ok(())
}

fn build_pipeline() -> Result<TripPipeline<Resolver>> {
    let metrics = AppMetrics::shared();
    let resolver = Resolver::from_env()?;

    Ok(TripPipeline::new(
        Arc::new(resolver),
        TaggerStack::load_default(),
        PipelineConfig::from_env(),
        metrics,
    ))
}
