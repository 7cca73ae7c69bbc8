use tracing::info;

use super::classify::analyse;
use super::client::ChatClient;
use super::session::ModelSession;
use super::summary::summarize;
use crate::commands::chunk::ClauseChunker;
use crate::commands::ingest::{NoiseFilter, RawDocument, ingest_document};
use crate::config::AnalysisConfig;
use crate::error::PipelineError;
use crate::model::{AnalysisResult, IngestionMetadata};

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub result: AnalysisResult,
    pub ingestion: IngestionMetadata,
}

/// ingest -> chunk -> analyse -> cool-down -> summarize. Any stage failure
/// ends the run without a partial result.
pub fn run_pipeline(
    document: &RawDocument,
    config: &AnalysisConfig,
    client: &dyn ChatClient,
) -> Result<PipelineOutcome, PipelineError> {
    let session = ModelSession::new(client, config);
    let filter = NoiseFilter::new()?;
    let chunker = ClauseChunker::new()?;

    info!(source_type = document.source_type().as_str(), "stage 1: ingestion");
    let ingestion = ingest_document(document, &filter)?;

    info!(chars = ingestion.cleaned_text.chars().count(), "stage 2: chunking");
    let chunks = chunker.chunk(&ingestion.cleaned_text)?;

    info!(clauses = chunks.clauses.len(), model = %config.model, "stage 3: clause analysis");
    let clauses = analyse(&session, &chunks.clauses)?;

    session.cool_down()?;

    info!("stage 4: executive summary");
    let summary = summarize(&session, &clauses)?;

    Ok(PipelineOutcome {
        result: AnalysisResult { clauses, summary },
        ingestion: ingestion.metadata,
    })
}
