use anyhow::Result;
use tracing::info;

use super::noise::NoiseFilter;
use super::source::{DocumentSource, ingest_document, load_document};
use crate::cli::IngestArgs;
use crate::config::InputLimits;
use crate::util::emit_json;

pub fn run(args: IngestArgs) -> Result<()> {
    let source = DocumentSource::from_args(&args.input)?;
    info!(source = %source.describe(), "starting ingest");

    let filter = NoiseFilter::new()?;
    let document = load_document(&source, InputLimits::from(&args.input))?;
    let output = ingest_document(&document, &filter)?;

    emit_json(args.output.as_deref(), &output)?;
    info!(
        source_type = output.metadata.source_type.as_str(),
        page_count = output.metadata.page_count,
        "ingest completed"
    );

    Ok(())
}
