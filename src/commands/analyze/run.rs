use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::client::HttpChatClient;
use super::pipeline::{PipelineOutcome, run_pipeline};
use crate::cli::AnalyzeArgs;
use crate::commands::ingest::{DocumentSource, load_document};
use crate::config::{AnalysisConfig, ClientConfig, InputLimits};
use crate::error::PipelineError;
use crate::model::{
    AnalysisCounts, AnalysisRunManifest, AnalyzeResponse, SeverityCounts, SourceFingerprint,
};
use crate::util::{emit_json, now_utc_string, sha256_bytes, utc_compact_string, write_json_pretty};

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));
    let manifest_path = (!args.no_manifest).then(|| {
        args.cache_root.join("manifests").join(format!(
            "analysis_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });
    let config = AnalysisConfig::from_args(&args.model);

    info!(run_id = %run_id, model = %config.model, "starting analyze");

    let started_at = now_utc_string();
    let mut manifest = AnalysisRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        status: "running".to_string(),
        started_at: started_at.clone(),
        updated_at: started_at,
        command: "analyze".to_string(),
        model: config.model.clone(),
        source: None,
        counts: AnalysisCounts::default(),
        failed_stage: None,
        failure_reason: None,
        output_path: args.output.as_ref().map(|path| path.display().to_string()),
    };

    let outcome = execute(&args, &config, &mut manifest);
    manifest.updated_at = now_utc_string();

    match outcome {
        Ok(outcome) => {
            record_success(&mut manifest, &outcome);
            emit_json(
                args.output.as_deref(),
                &AnalyzeResponse::success(outcome.result),
            )?;
            if let Some(path) = manifest_path.as_deref() {
                write_manifest(path, &manifest)?;
            }

            info!(
                clauses = manifest.counts.clauses,
                high = manifest.counts.high,
                medium = manifest.counts.medium,
                low = manifest.counts.low,
                "analyze completed"
            );
            Ok(())
        }
        Err(err) => {
            manifest.status = "failed".to_string();
            manifest.failed_stage = Some(err.stage().to_string());
            manifest.failure_reason = Some(err.user_message());

            emit_json(
                args.output.as_deref(),
                &AnalyzeResponse::failure(err.status_code(), err.user_message()),
            )?;
            if let Some(path) = manifest_path.as_deref() {
                if let Err(manifest_err) = write_manifest(path, &manifest) {
                    warn!(error = %manifest_err, "failed to write analysis run manifest");
                }
            }

            Err(err.into())
        }
    }
}

fn execute(
    args: &AnalyzeArgs,
    config: &AnalysisConfig,
    manifest: &mut AnalysisRunManifest,
) -> Result<PipelineOutcome, PipelineError> {
    let source = DocumentSource::from_args(&args.input)?;
    let document = load_document(&source, InputLimits::from(&args.input))?;
    manifest.source = Some(SourceFingerprint {
        source_type: document.source_type(),
        sha256: sha256_bytes(document.as_bytes()),
        byte_len: document.as_bytes().len(),
        page_count: None,
    });
    info!(source = %source.describe(), bytes = document.as_bytes().len(), "loaded document");

    let client = HttpChatClient::new(&ClientConfig::from_args(&args.model)?)?;
    run_pipeline(&document, config, &client)
}

fn record_success(manifest: &mut AnalysisRunManifest, outcome: &PipelineOutcome) {
    let severity = SeverityCounts::from_clauses(&outcome.result.clauses);
    manifest.status = "completed".to_string();
    manifest.counts = AnalysisCounts {
        clauses: outcome.result.clauses.len(),
        high: severity.high,
        medium: severity.medium,
        low: severity.low,
    };
    if let Some(source) = manifest.source.as_mut() {
        source.page_count = Some(outcome.ingestion.page_count);
    }
}

fn write_manifest(path: &Path, manifest: &AnalysisRunManifest) -> Result<()> {
    write_json_pretty(path, manifest)?;
    info!(path = %path.display(), status = %manifest.status, "wrote analysis run manifest");
    Ok(())
}
