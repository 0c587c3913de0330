//! ERC-8004 command-line interface.
//!
//! Thin presentation layer over the library: every subcommand maps to one
//! client call and prints either a human-readable summary or, with
//! `--json`, the result payload as JSON.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use erc8004::{networks, AgentUri, Erc8004Client};

#[derive(Parser)]
#[command(name = "erc8004")]
#[command(about = "ERC-8004 agent identity and reputation client", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network to use
    #[arg(long, short, global = true, default_value = "mainnet")]
    network: String,

    /// RPC URL override
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Get agent details by ID
    Agent {
        /// Agent ID
        id: u64,
    },
    /// Check if an agent exists
    Exists {
        /// Agent ID
        id: u64,
    },
    /// Get agent count for an address
    Owner {
        /// Ethereum address
        address: String,
    },
    /// Register a new agent (requires the PRIVATE_KEY environment variable)
    Register {
        /// Agent name
        #[arg(long)]
        name: Option<String>,

        /// Agent description
        #[arg(long, default_value = "")]
        description: String,

        /// Custom URI (overrides name/description)
        #[arg(long)]
        uri: Option<String>,
    },
    /// List supported networks
    Networks,
    /// Show contract addresses
    Contracts {
        /// Network to show (default: current)
        target_network: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let json_output = cli.json;

    match run_command(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json_output {
                println!("{}", json!({"error": e.to_string()}));
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Agent { id } => {
            let client = Erc8004Client::new(&cli.network, cli.rpc_url.as_deref())?;
            let agent = match client.get_agent(id).await {
                Some(agent) => agent,
                None => bail!("Agent {} not found on {}", id, cli.network),
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&agent)?);
            } else {
                println!("\nAgent #{} ({})", agent.agent_id, cli.network);
                println!("{}", "-".repeat(40));
                println!("Owner:    {}", agent.owner);
                println!(
                    "URI:      {}",
                    agent.token_uri.as_deref().unwrap_or("(not set)")
                );
                if let Some(metadata) = &agent.metadata {
                    if let Some(name) = metadata.get("name").and_then(|v| v.as_str()) {
                        println!("Name:     {}", name);
                    }
                    if let Some(desc) = metadata.get("description").and_then(|v| v.as_str()) {
                        if !desc.is_empty() {
                            println!("About:    {}", truncate(desc, 60));
                        }
                    }
                }
                println!("Explorer: {}", agent.explorer_url);
            }
        }

        Commands::Exists { id } => {
            let client = Erc8004Client::new(&cli.network, cli.rpc_url.as_deref())?;
            let exists = client.agent_exists(id).await;

            if cli.json {
                println!(
                    "{}",
                    json!({"agent_id": id, "exists": exists, "network": cli.network})
                );
            } else {
                let status = if exists { "exists" } else { "does not exist" };
                println!("Agent {} {} on {}", id, status, cli.network);
            }
        }

        Commands::Owner { address } => {
            let client = Erc8004Client::new(&cli.network, cli.rpc_url.as_deref())?;
            let count = client.get_agent_count(&address).await?;

            if cli.json {
                println!(
                    "{}",
                    json!({"address": address, "agent_count": count, "network": cli.network})
                );
            } else {
                println!(
                    "Address {} owns {} agent(s) on {}",
                    address, count, cli.network
                );
            }
        }

        Commands::Register {
            name,
            description,
            uri,
        } => {
            let private_key = std::env::var("PRIVATE_KEY")
                .context("PRIVATE_KEY environment variable required")?;
            if name.is_none() && uri.is_none() {
                bail!("--name or --uri required for registration");
            }

            let client = Erc8004Client::new(&cli.network, cli.rpc_url.as_deref())?;
            let result = match uri {
                Some(uri) => {
                    client
                        .register(&private_key, Some(AgentUri::Uri(uri)))
                        .await?
                }
                None => {
                    client
                        .register_agent(
                            &private_key,
                            name.as_deref().unwrap_or_default(),
                            &description,
                            "",
                            vec![],
                            None,
                        )
                        .await?
                }
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\nAgent Registered on {}!", cli.network);
                println!("{}", "-".repeat(40));
                match result.agent_id {
                    Some(id) => println!("Agent ID: {}", id),
                    None => println!("Agent ID: (not found in receipt)"),
                }
                println!("Owner:    {}", result.owner);
                println!("Tx:       {}", result.tx_hash);
                println!("Explorer: {}", result.explorer_url);
            }
        }

        Commands::Networks => {
            if cli.json {
                let mut table = serde_json::Map::new();
                for name in networks::network_names() {
                    table.insert(name.to_string(), serde_json::to_value(networks::lookup(name)?)?);
                }
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                println!("\nSupported Networks");
                println!("{}", "-".repeat(40));
                for name in networks::network_names() {
                    let config = networks::lookup(name)?;
                    println!("\n{} (Chain ID: {})", name.to_uppercase(), config.chain_id);
                    println!("  Identity:   {}", config.contracts.identity_registry);
                    println!("  Reputation: {}", config.contracts.reputation_registry);
                    println!("  Explorer:   {}", config.explorer_url);
                }
            }
        }

        Commands::Contracts { target_network } => {
            let target = target_network.as_deref().unwrap_or(&cli.network);
            let contracts = networks::contracts_for(target)?;

            if cli.json {
                let mut value = serde_json::to_value(contracts)?;
                value["network"] = json!(target);
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("\nERC-8004 Contracts on {}", target);
                println!("{}", "-".repeat(40));
                println!("Identity Registry:   {}", contracts.identity_registry);
                println!("Reputation Registry: {}", contracts.reputation_registry);
                if contracts.has_validation() {
                    println!("Validation Registry: {}", contracts.validation_registry);
                } else {
                    println!("Validation Registry: (not deployed)");
                }
            }
        }
    }

    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
