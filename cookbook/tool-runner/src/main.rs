use std::path::PathBuf;

use agent_tools::{
    agent_toolkit, capital_city, init_tracing, AppConfig, LocationTimeResolver, PageReader,
    SearchClient,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "tool-runner")]
#[command(about = "Run agent tools from the command line", long_about = None)]
struct Cli {
    /// TOML configuration file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tools
    List,
    /// Search the web
    Search {
        query: String,
        #[arg(long)]
        num: Option<usize>,
        /// Print a readable listing instead of JSON
        #[arg(long)]
        render: bool,
    },
    /// Current local time in a city
    Time { city: String },
    /// Capital city of a country
    Capital { country: String },
    /// Visible text of a web page
    Page { url: String },
    /// Invoke any tool by name with JSON arguments
    Call { tool: String, args: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_env_or_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::from_env(),
    };
    init_tracing(&config.logging);

    match cli.command {
        Commands::List => {
            for tool in agent_toolkit(&config)?.describe() {
                println!("{}: {}", tool.name, tool.description);
            }
        }
        Commands::Search { query, num, render } => {
            let client = SearchClient::from_config(&config.search)?;
            let response = match num {
                Some(n) => client.search_with_limit(&query, n).await,
                None => client.search(&query).await,
            };
            if render {
                println!("{}", response.render());
            } else {
                print_json(&serde_json::to_value(response)?)?;
            }
        }
        Commands::Time { city } => {
            let report = LocationTimeResolver::new().current_time(Some(&city));
            print_json(&serde_json::to_value(report)?)?;
        }
        Commands::Capital { country } => {
            print_json(&serde_json::to_value(capital_city(Some(&country)))?)?;
        }
        Commands::Page { url } => {
            let page = PageReader::from_config(&config.page)?.fetch_text(&url).await?;
            print_json(&serde_json::to_value(page)?)?;
        }
        Commands::Call { tool, args } => {
            let input: Value = serde_json::from_str(&args).context("arguments must be JSON")?;
            let output = agent_toolkit(&config)?.call(&tool, input).await?;
            print_json(&output)?;
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
