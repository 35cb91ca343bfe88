//! Directory command: resolve a directory against a metadata snapshot.

use std::path::Path;

use anyhow::{Context as _, Result};
use discovery_core::{Context, Directory};
use discovery_store::{DirectoryResolver, MemoryStore};

/// Run `discovery dir <path> --snapshot <file> [--version <v>] [--json]`.
pub async fn run(ctx: &Context, snapshot: &Path, dir_path: &str, version: &str, json: bool) -> Result<()> {
    let directory = resolve(ctx, snapshot, dir_path, version).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&directory)?);
    } else {
        print!("{}", render(&directory));
    }
    Ok(())
}

async fn resolve(ctx: &Context, snapshot: &Path, dir_path: &str, version: &str) -> Result<Directory> {
    let store = MemoryStore::load(snapshot)
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    tracing::debug!(
        versions = store.version_count(),
        packages = store.package_count(),
        "loaded snapshot"
    );
    DirectoryResolver::new(store)
        .get_directory(ctx, dir_path, version)
        .await
        .with_context(|| format!("resolving {dir_path}@{version}"))
}

fn render(directory: &Directory) -> String {
    let mut out = format!(
        "{} in {}@{} ({})\n",
        directory.path,
        directory.module_path,
        directory.version,
        directory.commit_time.to_rfc3339()
    );
    if let Some(source) = &directory.source {
        out.push_str(&format!("  source: {}\n", source.repository_url));
    }
    for package in &directory.packages {
        let name = if package.is_package() { package.name.as_str() } else { "-" };
        out.push_str(&format!("  {} ({name})", package.path));
        if !package.synopsis.is_empty() {
            out.push_str(&format!(": {}", package.synopsis));
        }
        out.push('\n');
    }
    out
}
