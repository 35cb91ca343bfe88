//! Directory resolution.

use discovery_core::{Context, Directory};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::query::DirectoryQuery;
use crate::row::{PackageRow, VersionRow};
use crate::store::{MemoryStore, MetadataStore};

/// Resolves directory paths to the owning module version and its packages.
#[derive(Debug, Clone)]
pub struct DirectoryResolver<S = MemoryStore> {
    store: S,
}

impl<S: MetadataStore> DirectoryResolver<S> {
    pub fn new(store: S) -> Self {
        DirectoryResolver { store }
    }

    /// Resolve `dir_path` at `version` (a concrete version or `latest`).
    ///
    /// The returned directory holds every package at or below `dir_path`
    /// in the most specific owning module, sorted by path. For `latest`,
    /// each candidate module contributes only its best-ranked version.
    pub async fn get_directory(
        &self,
        ctx: &Context,
        dir_path: &str,
        version: &str,
    ) -> Result<Directory> {
        let query = DirectoryQuery::new(dir_path, version)?;
        ctx.run(self.resolve(&query)).await?
    }

    async fn resolve(&self, query: &DirectoryQuery) -> Result<Directory> {
        let candidates = self.store.module_versions(query.dir_path()).await?;
        let mut selected = query.select_versions(candidates);
        debug!(
            dir_path = query.dir_path(),
            selector = %query.selector(),
            modules = selected.len(),
            "selected module versions"
        );

        // Most specific module first.
        selected.sort_by(|a, b| {
            b.module_path
                .len()
                .cmp(&a.module_path.len())
                .then_with(|| a.module_path.cmp(&b.module_path))
        });

        let mut owners: Vec<(VersionRow, Vec<PackageRow>)> = Vec::new();
        for version in selected {
            if let Some((owner, _)) = owners.first() {
                if version.module_path.len() < owner.module_path.len() {
                    break;
                }
            }
            let rows: Vec<PackageRow> = self
                .store
                .packages(query.dir_path(), &version.module_path, &version.version)
                .await?
                .into_iter()
                .filter(|p| query.contains_package(&p.path))
                .collect();
            if !rows.is_empty() {
                owners.push((version, rows));
            }
        }

        let (owner, rows) = single_owner(query.dir_path(), owners)?;
        build_directory(query.dir_path(), &owner, rows)
    }
}

/// Pick the one module among equally specific owners that have packages.
fn single_owner(
    dir_path: &str,
    owners: Vec<(VersionRow, Vec<PackageRow>)>,
) -> Result<(VersionRow, Vec<PackageRow>)> {
    let mut iter = owners.into_iter();
    match (iter.next(), iter.next()) {
        (None, _) => Err(StoreError::NotFound {
            what: format!("packages in directory {dir_path}"),
        }),
        (Some(owner), None) => Ok(owner),
        (Some(first), Some(second)) => {
            let modules = [first, second]
                .into_iter()
                .chain(iter)
                .map(|(v, _)| format!("{}@{}", v.module_path, v.version))
                .collect();
            Err(StoreError::AmbiguousModule {
                dir_path: dir_path.to_string(),
                modules,
            })
        }
    }
}

fn build_directory(dir_path: &str, owner: &VersionRow, mut rows: Vec<PackageRow>) -> Result<Directory> {
    rows.sort_by(|a, b| a.path.cmp(&b.path));
    rows.dedup_by(|a, b| a.path == b.path);
    let packages = rows
        .into_iter()
        .map(|row| row.into_package(owner))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        dir_path,
        module_path = %owner.module_path,
        version = %owner.version,
        packages = packages.len(),
        "resolved directory"
    );
    Ok(Directory {
        path: dir_path.to_string(),
        module_path: owner.module_path.clone(),
        version: owner.version.clone(),
        commit_time: owner.commit_time,
        readme: owner.readme(),
        source: owner.source(),
        packages,
    })
}
