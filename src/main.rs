//! CLI entry point for flatwiki

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flatwiki")]
#[command(version)]
#[command(about = "A minimal personal wiki over flat text files", long_about = None)]
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
    /// Serve the wiki over HTTP
    #[command(alias = "s")]
    Server {
        /// Port to listen on (overrides _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (overrides _config.yml)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// List page titles
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "flatwiki=debug,tower_http=debug,info"
    } else {
        "flatwiki=info"
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
            let wiki = flatwiki::Wiki::new(&base_dir)?;
            let port = port.unwrap_or(wiki.config.port);
            let ip = ip.unwrap_or_else(|| wiki.config.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            flatwiki::server::start(&wiki, &ip, port).await?;
        }

        Commands::List => {
            let wiki = flatwiki::Wiki::new(&base_dir)?;
            flatwiki::commands::list::run(&wiki)?;
        }

        Commands::Version => {
            println!("flatwiki version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
