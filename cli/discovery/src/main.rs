//! Discovery CLI: query a module proxy and resolve directories.

mod commands;
mod logging;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use discovery_core::{Context, LATEST};
use discovery_proxy::ClientConfig;

#[derive(Parser)]
#[command(name = "discovery", version, about = "Module discovery over a module proxy")]
struct Cli {
    /// Client configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Proxy base URL (overrides config and DISCOVERY_PROXY_URL)
    #[arg(long, global = true)]
    proxy: Option<String>,
    /// Overall time limit for the command, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the version and commit time of a module version
    Info {
        /// Module path
        module: String,
        /// Concrete version, or "latest"
        #[arg(long, default_value = LATEST)]
        version: String,
    },
    /// List the versions the proxy knows for a module
    Versions {
        /// Module path
        module: String,
    },
    /// Download a module zip and list its files
    Zip {
        /// Module path
        module: String,
        /// Concrete version
        version: String,
        /// Fail unless the archive hashes to this digest (sha256:<hex>)
        #[arg(long)]
        expect_hash: Option<String>,
    },
    /// Resolve a directory against a metadata snapshot
    Dir {
        /// Directory path
        path: String,
        /// JSON snapshot of the metadata store
        #[arg(long)]
        snapshot: PathBuf,
        /// Concrete version, or "latest"
        #[arg(long, default_value = LATEST)]
        version: String,
        /// Print the directory as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli).await;
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.proxy)?;
    let limit = cli.timeout.map(Duration::from_secs).unwrap_or(config.timeout());
    let ctx = Context::background().with_timeout(limit);
    cancel_on_interrupt(&ctx);

    match cli.command {
        Commands::Info { module, version } => {
            commands::proxy::info(&ctx, &config, &module, &version).await
        }
        Commands::Versions { module } => commands::proxy::versions(&ctx, &config, &module).await,
        Commands::Zip {
            module,
            version,
            expect_hash,
        } => commands::proxy::zip(&ctx, &config, &module, &version, expect_hash.as_deref()).await,
        Commands::Dir {
            path,
            snapshot,
            version,
            json,
        } => commands::directory::run(&ctx, &snapshot, &path, &version, json).await,
    }
}

/// Build the client configuration: file, then environment, then flags.
fn load_config(path: Option<&Path>, proxy: Option<String>) -> anyhow::Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let config = config
        .with_env_overrides()
        .context("applying environment overrides")?
        .with_proxy_url(proxy)
        .context("invalid --proxy")?;
    tracing::debug!(proxy_url = %config.proxy_url, timeout_secs = config.timeout_secs, "loaded config");
    Ok(config)
}

/// Cancel `ctx` when the process receives Ctrl-C.
fn cancel_on_interrupt(ctx: &Context) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, canceling");
            ctx.cancel();
        }
    });
}
