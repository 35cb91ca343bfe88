//! Proxy commands: info, versions, zip.

use anyhow::{bail, Context as _, Result};
use discovery_core::{latest, Context};
use discovery_proxy::{Client, ClientConfig};

fn client(config: &ClientConfig) -> Result<Client> {
    Client::new(config).context("creating proxy client")
}

/// Run `discovery info <module> [--version <v>]`.
pub async fn info(ctx: &Context, config: &ClientConfig, module: &str, version: &str) -> Result<()> {
    let info = client(config)?
        .get_info(ctx, module, version)
        .await
        .with_context(|| format!("fetching info for {module}@{version}"))?;
    println!("{} {} {}", info.module_path, info.version, info.time.to_rfc3339());
    Ok(())
}

/// Run `discovery versions <module>`.
pub async fn versions(ctx: &Context, config: &ClientConfig, module: &str) -> Result<()> {
    let versions = client(config)?
        .list_versions(ctx, module)
        .await
        .with_context(|| format!("listing versions of {module}"))?;
    if versions.is_empty() {
        println!("No versions published for {module}.");
    }
    let best = latest(versions.iter().map(String::as_str));
    for version in &versions {
        if Some(version.as_str()) == best {
            println!("{version} (latest)");
        } else {
            println!("{version}");
        }
    }
    Ok(())
}

/// Run `discovery zip <module> <version> [--expect-hash <digest>]`.
pub async fn zip(
    ctx: &Context,
    config: &ClientConfig,
    module: &str,
    version: &str,
    expect_hash: Option<&str>,
) -> Result<()> {
    let archive = client(config)?
        .get_zip(ctx, module, version)
        .await
        .with_context(|| format!("downloading {module}@{version}"))?;
    if let Some(expected) = expect_hash {
        if !archive.hash().matches(expected) {
            bail!("hash mismatch for {module}@{version}: expected {expected}, got {}", archive.hash());
        }
    }
    println!("{}@{} ({} files)", archive.module_path(), archive.version(), archive.len());
    println!("  {}", archive.hash());
    for entry in archive.entries() {
        println!("  {:>8}  {}", entry.contents.len(), archive.relative_path(entry));
    }
    Ok(())
}
