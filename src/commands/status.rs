use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::AnalysisRunManifest;

const MANIFEST_PREFIX: &str = "analysis_run_";

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.cache_root.join("manifests");

    info!(cache_root = %args.cache_root.display(), "status requested");

    if !manifest_dir.exists() {
        warn!(path = %manifest_dir.display(), "manifest directory missing");
        return Ok(());
    }

    let paths = latest_manifest_paths(&manifest_dir, args.limit)?;
    if paths.is_empty() {
        warn!(path = %manifest_dir.display(), "no analysis run manifests found");
        return Ok(());
    }

    for path in paths {
        let manifest = load_manifest(&path)?;
        let source = manifest.source.as_ref();

        info!(
            run_id = %manifest.run_id,
            status = %manifest.status,
            model = %manifest.model,
            started_at = %manifest.started_at,
            updated_at = %manifest.updated_at,
            source_type = source.map(|value| value.source_type.as_str()).unwrap_or_default(),
            source_sha256 = %source.map(|value| value.sha256.as_str()).unwrap_or_default(),
            page_count = source.and_then(|value| value.page_count).unwrap_or_default(),
            clauses = manifest.counts.clauses,
            high = manifest.counts.high,
            medium = manifest.counts.medium,
            low = manifest.counts.low,
            failed_stage = %manifest.failed_stage.unwrap_or_default(),
            failure_reason = %manifest.failure_reason.unwrap_or_default(),
            "loaded analysis run manifest"
        );
    }

    Ok(())
}

/// Newest first. Manifest names embed a compact UTC stamp, so name order is
/// chronological.
fn latest_manifest_paths(manifest_dir: &Path, limit: usize) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?
        .filter_map(|entry| entry.ok().map(|value| value.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(MANIFEST_PREFIX) && name.ends_with(".json"))
                .unwrap_or(false)
        })
        .collect::<Vec<PathBuf>>();

    paths.sort();
    paths.reverse();
    paths.truncate(limit);
    Ok(paths)
}

fn load_manifest(path: &Path) -> Result<AnalysisRunManifest> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
