use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use flawis_gateway::config::loader::load_config;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the FlawIS gateway", long_about = None)]
struct Cli {
    /// Gateway base URL for remote commands.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a configuration file
    CheckConfig {
        /// Path to the TOML config file
        path: PathBuf,
    },
    /// Check gateway liveness
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckConfig { path } => match load_config(&path) {
            Ok(config) => {
                println!("Config OK: {}", path.display());
                println!("  listener:        {}", config.listener.bind_address);
                println!("  app upstream:    {}", config.upstream.app_address);
                println!("  search upstream: {}", config.upstream.search_base_url);
                println!(
                    "  languages:       {} (fallback {})",
                    config.i18n.languages.join(", "),
                    config.i18n.fallback
                );
                println!("  tenant rules:    {}", config.tenants.rules.len());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Config invalid: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::Status => {
            let client = reqwest::Client::new();
            let result = client
                .get(format!("{}/healthz", cli.url))
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            match result {
                Ok(response) => match response.json::<Value>().await {
                    Ok(json) => {
                        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("Error: invalid health response: {e}");
                        ExitCode::FAILURE
                    }
                },
                Err(e) => {
                    eprintln!("Error: gateway unreachable: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
