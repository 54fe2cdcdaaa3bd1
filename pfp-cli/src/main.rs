//! pfp-proxy CLI
//!
//! Runs the avatar/profile proxy server, or performs one-shot lookups against
//! Discord and GitHub and prints the JSON the server would serve.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pfp_api::{ApiConfig, ApiServer};
use pfp_core::constants::{DEFAULT_DISCORD_API_BASE, DEFAULT_GITHUB_API_BASE, DEFAULT_IMAGE_SIZE};
use pfp_core::derive::{derive_avatar, derive_banner};
use pfp_core::types::{GitHubProfile, ImageSize};
use pfp_core::validate::{is_valid_github_login, is_valid_user_id};
use pfp_upstream::{DiscordClient, DiscordConfig, GitHubClient, GitHubConfig};

/// pfp-proxy - cached Discord and GitHub avatar proxy
#[derive(Parser)]
#[command(name = "pfp-proxy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Look up a Discord avatar
    Avatar {
        /// Discord user id
        user_id: String,
        /// Image size (64-4096, power of two)
        #[arg(short, long, default_value_t = DEFAULT_IMAGE_SIZE)]
        size: u32,
        #[command(flatten)]
        discord: DiscordArgs,
    },

    /// Look up a Discord banner
    Banner {
        /// Discord user id
        user_id: String,
        /// Image size (64-4096, power of two)
        #[arg(short, long, default_value_t = DEFAULT_IMAGE_SIZE)]
        size: u32,
        #[command(flatten)]
        discord: DiscordArgs,
    },

    /// Look up a GitHub profile
    Github {
        /// GitHub login
        username: String,
        /// Optional token for higher rate limits
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// GitHub API base URL
        #[arg(long, env = "GITHUB_API_BASE", default_value = DEFAULT_GITHUB_API_BASE)]
        api_base: String,
    },
}

#[derive(clap::Args)]
struct DiscordArgs {
    /// Discord bot token
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    token: String,
    /// Discord API base URL
    #[arg(long, env = "DISCORD_API_BASE", default_value = DEFAULT_DISCORD_API_BASE)]
    api_base: String,
}

impl DiscordArgs {
    fn client(self) -> Result<DiscordClient> {
        let config = DiscordConfig::new(self.token).with_api_base(self.api_base);
        DiscordClient::with_config(config).context("Failed to build Discord client")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Populate the environment before clap reads `env = ...` defaults.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "pfp=debug,info"
    } else {
        "pfp=info,warn"
    };
    init_tracing(filter);

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Avatar {
            user_id,
            size,
            discord,
        } => cmd_avatar(&user_id, size, discord).await,
        Commands::Banner {
            user_id,
            size,
            discord,
        } => cmd_banner(&user_id, size, discord).await,
        Commands::Github {
            username,
            token,
            api_base,
        } => cmd_github(&username, token, api_base).await,
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    println!("{}", "Starting pfp-proxy...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/ping", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let mut config = ApiConfig::from_env().context("Invalid configuration")?;
    config.port = port;
    let server = ApiServer::new(config).context("Failed to start server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;
    server.run(addr).await?;

    Ok(())
}

/// Print a Discord avatar
async fn cmd_avatar(user_id: &str, size: u32, discord: DiscordArgs) -> Result<()> {
    check_user_id(user_id)?;
    let size = check_size(size)?;

    let user = discord
        .client()?
        .fetch_user(user_id)
        .await
        .context("Could not fetch avatar")?;

    print_json(&derive_avatar(&user, size.get()))
}

/// Print a Discord banner
async fn cmd_banner(user_id: &str, size: u32, discord: DiscordArgs) -> Result<()> {
    check_user_id(user_id)?;
    let size = check_size(size)?;

    let user = discord
        .client()?
        .fetch_user(user_id)
        .await
        .context("Could not fetch user data")?;

    let banner = derive_banner(&user, size.get()).context("Banner not available")?;
    print_json(&banner)
}

/// Print a GitHub profile
async fn cmd_github(username: &str, token: Option<String>, api_base: String) -> Result<()> {
    if !is_valid_github_login(username) {
        bail!("Invalid username: {}", username);
    }

    let mut config = GitHubConfig::default().with_api_base(api_base);
    if let Some(token) = token {
        config = config.with_token(token);
    }
    let client = GitHubClient::with_config(config).context("Failed to build GitHub client")?;

    let user = client
        .fetch_user(username)
        .await
        .context("Could not fetch GitHub user data")?;

    print_json(&GitHubProfile::from(&user))
}

fn check_user_id(user_id: &str) -> Result<()> {
    if !is_valid_user_id(user_id) {
        bail!("Invalid user ID: {}", user_id);
    }
    Ok(())
}

fn check_size(size: u32) -> Result<ImageSize> {
    ImageSize::new(size).with_context(|| {
        format!("Unsupported size {}; use one of 64, 128, 256, 512, 1024, 2048, 4096", size)
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
