use std::fs;

use super::noise::NoiseFilter;
use super::source::*;
use crate::config::InputLimits;
use crate::error::PipelineError;
use crate::model::SourceType;

fn filter() -> NoiseFilter {
    NoiseFilter::new().expect("noise patterns should compile")
}

#[test]
fn clean_removes_every_page_marker_variant() {
    let topics = [
        "pricing", "delivery", "warranty", "audit", "security", "insurance", "liability",
        "notices", "assignment", "disputes", "termination", "transition",
    ];
    let mut raw = String::new();
    for (index, topic) in topics.iter().enumerate() {
        raw.push_str(&format!(
            "The Supplier shall keep {topic} records.\nPage {} of 12\n",
            index + 1
        ));
    }

    let (cleaned, stats) = filter().clean_with_stats(&raw);

    assert!(!cleaned.to_lowercase().contains("page "));
    assert_eq!(stats.repeated_lines_removed, 12);
    for topic in topics {
        assert!(cleaned.contains(&format!("The Supplier shall keep {topic} records.")));
    }
}

#[test]
fn clean_removes_repeated_running_headers_with_changing_numbers() {
    let raw = "\
ACME SERVICES AGREEMENT v3 - CONFIDENTIAL 1
1. DEFINITIONS
Agreement means this document.
ACME SERVICES AGREEMENT v3 - CONFIDENTIAL 2
2. PAYMENT TERMS
Invoices are payable within 30 days.
ACME SERVICES AGREEMENT v3 - CONFIDENTIAL 3
3. TERMINATION
Either party may terminate on notice.";

    let (cleaned, stats) = filter().clean_with_stats(raw);

    assert!(!cleaned.contains("CONFIDENTIAL"));
    assert_eq!(stats.repeated_lines_removed, 3);
    assert!(cleaned.contains("1. DEFINITIONS"));
    assert!(cleaned.contains("Invoices are payable within 30 days."));
}

#[test]
fn clean_keeps_lines_seen_fewer_than_three_times() {
    let raw = "The Client shall pay all invoices.\nSomething else entirely here.\nThe Client shall pay all invoices.";
    let cleaned = filter().clean(raw);
    assert_eq!(cleaned.matches("The Client shall pay all invoices.").count(), 2);
}

#[test]
fn clean_ignores_short_repeated_lines() {
    let raw = "Yes\nbody text line one\nYes\nbody text line two\nYes";
    let cleaned = filter().clean(raw);
    assert_eq!(cleaned.matches("Yes").count(), 3);
}

#[test]
fn clean_strips_fixed_noise_patterns() {
    let raw = "\
Preamble line for the agreement.
-----
———
-- 3 of 9 --
© 2024 Example Holdings Ltd. All rights reserved.
PAGE 4
\u{000C}
Closing line for the agreement.";

    let (cleaned, stats) = filter().clean_with_stats(raw);

    assert_eq!(
        cleaned,
        "Preamble line for the agreement.\n\nClosing line for the agreement."
    );
    assert_eq!(stats.pattern_lines_removed, 5);
}

#[test]
fn clean_normalizes_whitespace_and_blank_runs() {
    let raw = "  \t 1.   DEFINITIONS   \r\n\n\n\n\nTerm\t\tmeans  the period. \n\n\n  ";
    let cleaned = filter().clean(raw);
    assert_eq!(cleaned, "1. DEFINITIONS\n\nTerm means the period.");
}

#[test]
fn clean_output_has_no_double_blank_lines_or_padding() {
    let raw = "\n\n A \n\n\n\n B \n \n \n C\u{00A0}\u{00A0}D \n\n";
    let cleaned = filter().clean(raw);

    assert!(!cleaned.contains("\n\n\n"));
    for line in cleaned.lines() {
        assert_eq!(line, line.trim());
    }
    assert_eq!(cleaned, cleaned.trim());
    assert!(cleaned.contains("C D"));
}

#[test]
fn clean_is_idempotent() {
    let inputs = [
        "",
        "   \n\n  ",
        "Header   line   repeated here 1\nbody\nHeader line repeated here 2\nmore body\nHeader  line repeated here 3",
        "Page 1 of 3\n\n\n\n1. SCOPE\n  The   services\tare described.\n\u{000C}\nPage 2 of 3\n©2024\n----\n2. FEES",
        "Foo  bar  baz  qux 1\nFoo bar baz qux 2\nFoo bar  baz qux 3\nkept line",
        "A line that is long enough\nA line that is long enough\n\n\n\nunique tail",
    ];

    let filter = filter();
    for input in inputs {
        let once = filter.clean(input);
        let twice = filter.clean(&once);
        assert_eq!(once, twice, "clean is not idempotent for {input:?}");
    }
}

#[test]
fn repeated_header_detection_is_per_call() {
    let filter = filter();
    let first = "Shared footer text 1\nShared footer text 2\nShared footer text 3\nbody";
    let second = "Shared footer text 9\nreal content here";

    assert_eq!(filter.clean(first), "body");
    assert_eq!(
        filter.clean(second),
        "Shared footer text 9\nreal content here"
    );
}

#[test]
fn ingest_text_rejects_blank_input() {
    let err = ingest_text(" \n\t ", &filter()).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(ref message) if message == "Empty text input provided"));
}

#[test]
fn ingest_text_estimates_pages_from_cleaned_length() {
    let raw = "word ".repeat(1500);
    let output = ingest_text(&raw, &filter()).unwrap();

    assert_eq!(output.metadata.source_type, SourceType::Text);
    assert_eq!(output.cleaned_text.chars().count(), 7499);
    assert_eq!(output.metadata.page_count, 3);
    assert_eq!(estimate_page_count(""), 0);
    assert_eq!(estimate_page_count("x"), 1);
}

#[test]
fn load_document_enforces_text_limits() {
    let limits = InputLimits::default();

    let err = load_document(&DocumentSource::Text("   ".to_string()), limits).unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = load_document(&DocumentSource::Text("too short".to_string()), limits).unwrap_err();
    assert!(err.to_string().contains("at least 50 characters"));

    let text = "This Services Agreement is made between Acme Ltd and Beta Ltd.".to_string();
    let document = load_document(&DocumentSource::Text(text.clone()), limits).unwrap();
    assert_eq!(document, RawDocument::Text(text));
}

#[test]
fn load_document_rejects_oversized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.pdf");
    fs::write(&path, vec![b'x'; 2048]).unwrap();

    let limits = InputLimits {
        max_file_bytes: 1024,
        ..InputLimits::default()
    };
    let err = load_document(&DocumentSource::File(path), limits).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(err.to_string().contains("File size exceeds"));
}

#[test]
fn load_document_sniffs_pdf_and_text_files() {
    let dir = tempfile::tempdir().unwrap();

    let pdf_path = dir.path().join("upload.bin");
    fs::write(&pdf_path, b"%PDF-1.7\n%binary").unwrap();
    let document = load_document(&DocumentSource::File(pdf_path), InputLimits::default()).unwrap();
    assert_eq!(document.source_type(), SourceType::Pdf);

    let text_path = dir.path().join("contract.txt");
    fs::write(
        &text_path,
        "1. DEFINITIONS\nIn this Agreement the following terms apply to both parties.",
    )
    .unwrap();
    let document = load_document(&DocumentSource::File(text_path), InputLimits::default()).unwrap();
    assert_eq!(document.source_type(), SourceType::Text);
}

#[test]
fn load_document_rejects_binary_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.docx");
    fs::write(&path, [0xff_u8, 0xfe, 0x00, 0x81, 0x92]).unwrap();

    let err = load_document(&DocumentSource::File(path), InputLimits::default()).unwrap_err();
    assert!(err.to_string().contains("unsupported content type"));
}

#[test]
fn load_document_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_document(
        &DocumentSource::File(dir.path().join("missing.pdf")),
        InputLimits::default(),
    )
    .unwrap_err();
    assert_eq!(err.status_code(), 400);
}
