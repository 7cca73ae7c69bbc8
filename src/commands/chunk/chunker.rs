use anyhow::Result;
use tracing::info;

use super::clauses::ClauseBuilder;
use super::segment::SectionSegmenter;
use crate::error::ChunkError;
use crate::model::ChunkingOutput;

/// Heading detection, segmentation and clause building over cleaned text.
#[derive(Debug)]
pub struct ClauseChunker {
    segmenter: SectionSegmenter,
    builder: ClauseBuilder,
}

impl ClauseChunker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            segmenter: SectionSegmenter::new()?,
            builder: ClauseBuilder::new()?,
        })
    }

    pub fn chunk(&self, cleaned_text: &str) -> Result<ChunkingOutput, ChunkError> {
        let sections = self.segmenter.segment(cleaned_text);
        let clauses = self.builder.build(&sections)?;

        info!(
            sections = sections.len(),
            clauses = clauses.len(),
            "chunked document"
        );

        Ok(ChunkingOutput { clauses })
    }
}
