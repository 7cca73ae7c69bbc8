use anyhow::Result;
use tracing::info;

use super::chunker::ClauseChunker;
use crate::cli::ChunkArgs;
use crate::commands::ingest::{DocumentSource, NoiseFilter, ingest_document, load_document};
use crate::config::InputLimits;
use crate::error::PipelineError;
use crate::util::emit_json;

pub fn run(args: ChunkArgs) -> Result<()> {
    let source = DocumentSource::from_args(&args.input)?;
    info!(source = %source.describe(), "starting chunk");

    let filter = NoiseFilter::new()?;
    let chunker = ClauseChunker::new()?;

    let document = load_document(&source, InputLimits::from(&args.input))?;
    let ingestion = ingest_document(&document, &filter)?;
    let output = chunker
        .chunk(&ingestion.cleaned_text)
        .map_err(PipelineError::from)?;

    emit_json(args.output.as_deref(), &output)?;
    info!(
        page_count = ingestion.metadata.page_count,
        clauses = output.clauses.len(),
        "chunk completed"
    );

    Ok(())
}
