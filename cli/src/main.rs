//! Command-line front end: query a daemon's JSON API over its Unix socket.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dockwire::{Client, ClientConfig, SystemVersion};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dockwire", version, about = "Talk HTTP/1.1 to a daemon over a Unix socket")]
struct Cli {
    /// Socket path; defaults to DOCKER_HOST (unix://) or /var/run/docker.sock
    #[arg(long, env = "DOCKWIRE_SOCKET")]
    socket: Option<PathBuf>,

    /// Value of the Host header
    #[arg(long)]
    host: Option<String>,

    /// Read/write timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log filter, e.g. `debug` or `dockwire=trace`
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the daemon version (GET /version)
    Version,
    /// GET any path and pretty-print the JSON body
    Get {
        /// Request path, e.g. /containers/json
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(socket) = cli.socket {
        config.socket_path = socket;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    tracing::debug!(?config, "client configuration");

    let socket = config.socket_path.clone();
    let mut client = Client::connect(config).with_context(|| format!("cannot reach daemon at {}", socket.display()))?;

    match cli.command {
        Commands::Version => {
            let response = client.get::<SystemVersion>("/version").context("GET /version failed")?;
            if !response.is_success() {
                bail!("daemon answered {}", response.status);
            }
            let version = response.body;
            println!("Version:     {}", version.version);
            println!("API version: {}", version.api_version);
            if let Some(min) = &version.min_api_version {
                println!("Min API:     {min}");
            }
            println!("OS/Arch:     {}/{}", version.os, version.arch);
            for component in &version.components {
                println!("  {:<10} {}", component.name, component.version);
            }
        }
        Commands::Get { path } => {
            let response = client
                .get::<serde_json::Value>(&path)
                .with_context(|| format!("GET {path} failed"))?;
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            if !response.is_success() {
                bail!("daemon answered {}", response.status);
            }
        }
    }

    client.close().context("closing socket")?;
    Ok(())
}
