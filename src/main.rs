//! CLI entry point for kitchen-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kitchen-rs")]
#[command(version)]
#[command(about = "A server-rendered blog front-end for a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port in _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in _config.yml)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Export the site as static files
    #[command(alias = "g")]
    Generate,

    /// Clean the public folder
    Clean,

    /// List posts in the CMS
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "kitchen_rs=debug,info"
    } else {
        "kitchen_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let kitchen = kitchen_rs::Kitchen::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| kitchen.config.server.ip.clone());
            let port = port.unwrap_or(kitchen.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            kitchen_rs::server::start(&kitchen, &ip, port).await?;
        }

        Commands::Generate => {
            let kitchen = kitchen_rs::Kitchen::new(&base_dir)?;
            tracing::info!("Generating static files...");
            kitchen.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Clean => {
            let kitchen = kitchen_rs::Kitchen::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            kitchen.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let kitchen = kitchen_rs::Kitchen::new(&base_dir)?;
            kitchen_rs::commands::list::run(&kitchen).await?;
        }

        Commands::Version => {
            println!("kitchen-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
