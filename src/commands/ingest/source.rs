use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{debug, info};

use super::noise::NoiseFilter;
use crate::cli::InputArgs;
use crate::config::InputLimits;
use crate::error::PipelineError;
use crate::model::{IngestionMetadata, IngestionOutput, SourceType};

const PDF_MAGIC: &[u8] = b"%PDF-";
const CHARS_PER_ESTIMATED_PAGE: usize = 3000;

/// Where the contract comes from, before anything is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Text(String),
}

impl DocumentSource {
    pub fn from_args(args: &InputArgs) -> Result<Self, PipelineError> {
        match (&args.file, &args.text) {
            (Some(path), None) => Ok(DocumentSource::File(path.clone())),
            (None, Some(text)) => Ok(DocumentSource::Text(text.clone())),
            (Some(_), Some(_)) => Err(PipelineError::InvalidInput(
                "Provide either a contract file or contract text, not both".to_string(),
            )),
            (None, None) => Err(PipelineError::InvalidInput(
                "Please provide a PDF file or paste contract text".to_string(),
            )),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DocumentSource::File(path) => path.display().to_string(),
            DocumentSource::Text(_) => "<inline text>".to_string(),
        }
    }
}

/// Document content held for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDocument {
    Pdf(Vec<u8>),
    Text(String),
}

impl RawDocument {
    pub fn source_type(&self) -> SourceType {
        match self {
            RawDocument::Pdf(_) => SourceType::Pdf,
            RawDocument::Text(_) => SourceType::Text,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawDocument::Pdf(bytes) => bytes,
            RawDocument::Text(text) => text.as_bytes(),
        }
    }
}

pub fn load_document(
    source: &DocumentSource,
    limits: InputLimits,
) -> Result<RawDocument, PipelineError> {
    match source {
        DocumentSource::File(path) => load_file(path, limits),
        DocumentSource::Text(text) => {
            validate_text(text, limits)?;
            Ok(RawDocument::Text(text.clone()))
        }
    }
}

fn load_file(path: &Path, limits: InputLimits) -> Result<RawDocument, PipelineError> {
    let metadata = fs::metadata(path).map_err(|err| {
        PipelineError::InvalidInput(format!("failed to read {}: {err}", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(PipelineError::InvalidInput(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > limits.max_file_bytes {
        return Err(PipelineError::InvalidInput(format!(
            "File size exceeds {} limit",
            format_size_limit(limits.max_file_bytes)
        )));
    }

    let bytes = fs::read(path).map_err(|err| {
        PipelineError::InvalidInput(format!("failed to read {}: {err}", path.display()))
    })?;

    let has_pdf_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if bytes.starts_with(PDF_MAGIC) || has_pdf_extension {
        debug!(path = %path.display(), bytes = bytes.len(), "loaded pdf document");
        return Ok(RawDocument::Pdf(bytes));
    }

    let text = String::from_utf8(bytes).map_err(|_| {
        PipelineError::InvalidInput(format!(
            "unsupported content type for {}: expected a PDF or UTF-8 text file",
            path.display()
        ))
    })?;
    validate_text(&text, limits)?;
    debug!(path = %path.display(), chars = text.chars().count(), "loaded text document");
    Ok(RawDocument::Text(text))
}

fn validate_text(text: &str, limits: InputLimits) -> Result<(), PipelineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::InvalidInput(
            "Please provide contract text".to_string(),
        ));
    }

    let chars = trimmed.chars().count();
    if chars < limits.min_text_chars {
        return Err(PipelineError::InvalidInput(format!(
            "Contract text must be at least {} characters (got {chars})",
            limits.min_text_chars
        )));
    }

    Ok(())
}

fn format_size_limit(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

pub fn ingest_document(
    document: &RawDocument,
    filter: &NoiseFilter,
) -> Result<IngestionOutput, PipelineError> {
    match document {
        RawDocument::Pdf(bytes) => ingest_pdf(bytes, filter),
        RawDocument::Text(text) => ingest_text(text, filter),
    }
}

pub fn ingest_pdf(bytes: &[u8], filter: &NoiseFilter) -> Result<IngestionOutput, PipelineError> {
    let pages = extract_pdf_pages(bytes)
        .map_err(|err| PipelineError::Ingestion(format!("{err:#}")))?;
    let page_count = pages.len().max(1);

    let (cleaned_text, stats) = filter.clean_with_stats(&pages.join("\n\n"));
    info!(
        page_count,
        chars = cleaned_text.chars().count(),
        repeated_lines_removed = stats.repeated_lines_removed,
        pattern_lines_removed = stats.pattern_lines_removed,
        "ingested pdf"
    );

    Ok(IngestionOutput {
        cleaned_text,
        metadata: IngestionMetadata {
            page_count,
            source_type: SourceType::Pdf,
        },
    })
}

pub fn ingest_text(raw_text: &str, filter: &NoiseFilter) -> Result<IngestionOutput, PipelineError> {
    if raw_text.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "Empty text input provided".to_string(),
        ));
    }

    let (cleaned_text, stats) = filter.clean_with_stats(raw_text);
    let page_count = estimate_page_count(&cleaned_text);
    info!(
        page_count,
        chars = cleaned_text.chars().count(),
        repeated_lines_removed = stats.repeated_lines_removed,
        pattern_lines_removed = stats.pattern_lines_removed,
        "ingested text"
    );

    Ok(IngestionOutput {
        cleaned_text,
        metadata: IngestionMetadata {
            page_count,
            source_type: SourceType::Text,
        },
    })
}

pub fn estimate_page_count(cleaned_text: &str) -> usize {
    cleaned_text.chars().count().div_ceil(CHARS_PER_ESTIMATED_PAGE)
}

fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let pdf_path = std::env::temp_dir().join(format!(
        "clauserisk_ingest_{}_{}.pdf",
        std::process::id(),
        stamp
    ));

    fs::write(&pdf_path, bytes)
        .with_context(|| format!("failed to stage pdf at {}", pdf_path.display()))?;
    let extracted = extract_pages_with_pdftotext(&pdf_path);
    let _ = fs::remove_file(&pdf_path);

    extracted
}

fn extract_pages_with_pdftotext(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pdftotext_pages(&String::from_utf8_lossy(&output.stdout)))
}

/// pdftotext separates pages with form feeds and ends with one.
fn split_pdftotext_pages(raw: &str) -> Vec<String> {
    let mut pages = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}
