use std::process;

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;

use calgate_auth::{SigningSecret, TokenIssuer, DEFAULT_VALIDITY_HOURS};
use calgate_cli::config::{Config, SECRET_KEY_VAR};

#[derive(Parser)]
#[command(name = "calgate")]
#[command(about = "Calgate - Google Calendar scheduling behind bearer credentials")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen address (overrides HOST)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a bearer credential signed with SECRET_KEY, for local testing
    IssueToken {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        access_token: String,
        #[arg(long, default_value_t = DEFAULT_VALIDITY_HOURS)]
        ttl_hours: i64,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    calgate_cli::logging::init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => {
            let mut config = Config::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                anyhow::ensure!(port != 0, "Port 0 is out of valid range (1-65535)");
                config.port = port;
            }

            println!(
                "{} http://{}:{}",
                "Calgate listening on".green().bold(),
                config.host,
                config.port
            );
            calgate_cli::run_server(config).await
        }
        Commands::IssueToken {
            user_id,
            access_token,
            ttl_hours,
        } => issue_token(&user_id, &access_token, ttl_hours),
    }
}

fn issue_token(user_id: &str, access_token: &str, ttl_hours: i64) -> anyhow::Result<()> {
    let secret = SigningSecret::from_env(SECRET_KEY_VAR)?;
    let validity = Duration::try_hours(ttl_hours).context("--ttl-hours is out of range")?;
    let issuer = TokenIssuer::new(&secret)
        .with_validity(validity)
        .context("Invalid --ttl-hours")?;

    let credential = issuer.issue(user_id, access_token)?;
    let expires_at = Utc::now() + issuer.validity();

    eprintln!(
        "{} {}",
        "Expires:".cyan(),
        expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}", credential);
    Ok(())
}
