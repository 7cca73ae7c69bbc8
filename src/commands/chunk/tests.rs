use super::chunker::ClauseChunker;
use super::clauses::MIN_CLAUSE_CHARS;
use super::heading::{HeadingDetector, HeadingKind};
use super::segment::{FULL_DOCUMENT_TITLE, PREAMBLE_TITLE, SectionSegmenter};
use crate::error::ChunkError;

fn detector() -> HeadingDetector {
    HeadingDetector::new().expect("heading patterns should compile")
}

fn chunker() -> ClauseChunker {
    ClauseChunker::new().expect("chunker patterns should compile")
}

#[test]
fn detects_common_heading_shapes() {
    let detector = detector();

    assert_eq!(
        detector.classify("14. General Provisions"),
        Some(HeadingKind::NumberedTitleCase)
    );
    assert_eq!(
        detector.classify("SECTION 5 — TERMINATION"),
        Some(HeadingKind::KeywordSeparated)
    );
    assert_eq!(
        detector.classify("Clause 12: Fees"),
        Some(HeadingKind::KeywordSeparated)
    );
    assert_eq!(detector.classify("Article III"), Some(HeadingKind::KeywordBare));
    assert_eq!(detector.classify("7. FEES"), Some(HeadingKind::NumberedUpperCase));
    assert!(detector.is_heading("9. INDEMNIFICATION, LIABILITY AND RISK ALLOCATION"));
    assert!(detector.is_heading("3 Intellectual Property & Licences"));
}

#[test]
fn rejects_body_text_as_heading() {
    let detector = detector();
    let body_lines = [
        "The Supplier shall deliver the goods.",
        "2024 revenue figures are attached",
        "1. the supplier shall deliver",
        "3. Payment of 500 dollars",
        "Sectional changes apply",
        "1234. TOO MANY DIGITS",
        "1. The supplier shall provide monthly reports to the client for review.",
    ];

    for line in body_lines {
        assert!(!detector.is_heading(line), "unexpected heading: {line}");
        assert_eq!(detector.classify(line), None, "unexpected rule for: {line}");
    }
}

#[test]
fn title_case_rule_bounds_heading_length() {
    let detector = detector();
    assert!(detector.is_heading("1. Ab Cd"));
    assert!(!detector.is_heading("1. Ab C"));

    let long = format!("2. {}", "Word ".repeat(30).trim_end());
    assert!(!detector.is_heading(&long));
}

#[test]
fn annex_headings_are_detected_separately() {
    let detector = detector();
    assert!(detector.is_annex_heading("SCHEDULE A — PRICING"));
    assert!(detector.is_annex_heading("Appendix 2"));
    assert!(detector.is_annex_heading("Exhibit B"));
    assert!(!detector.is_heading("SCHEDULE A — PRICING"));
    assert_eq!(
        detector.classify("Annex C Service Levels"),
        Some(HeadingKind::Annex)
    );
}

#[test]
fn chunks_preamble_and_numbered_clauses() {
    let text = "\
This Services Agreement is made between Acme Ltd and Beta Ltd.

1. DEFINITIONS
In this Agreement the following definitions apply to both parties.

2. PAYMENT TERMS
The Client shall pay all invoices within 30 days of receipt.";

    let output = chunker().chunk(text).unwrap();
    let ids = output
        .clauses
        .iter()
        .map(|clause| clause.clause_id.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(ids, vec!["section-1", "clause-1", "clause-2"]);

    assert_eq!(output.clauses[0].clause_title, PREAMBLE_TITLE);
    assert_eq!(
        output.clauses[0].clause_text,
        "This Services Agreement is made between Acme Ltd and Beta Ltd."
    );
    assert_eq!(output.clauses[1].clause_title, "DEFINITIONS");
    assert_eq!(output.clauses[2].clause_title, "PAYMENT TERMS");
    assert_eq!(
        output.clauses[2].clause_text,
        "The Client shall pay all invoices within 30 days of receipt."
    );
}

#[test]
fn annex_sections_get_designator_ids() {
    let text = "\
1. SCOPE
The Supplier provides managed hosting services to the Client.
SCHEDULE A — PRICING
Monthly fees are set out in the table below and are fixed.";

    let output = chunker().chunk(text).unwrap();
    assert_eq!(output.clauses.len(), 2);
    assert_eq!(output.clauses[1].clause_id, "annex-a");
    assert_eq!(output.clauses[1].clause_title, "SCHEDULE A — PRICING");
}

#[test]
fn exhibit_sections_fall_back_to_positional_annex_ids() {
    let text = "\
1. SCOPE
The Supplier provides managed hosting services to the Client.
EXHIBIT B
Service credits apply as set out in the table in this exhibit.";

    let output = chunker().chunk(text).unwrap();
    let ids = output
        .clauses
        .iter()
        .map(|clause| clause.clause_id.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(ids, vec!["clause-1", "annex-1"]);
    assert_eq!(output.clauses[1].clause_title, "EXHIBIT B");
}

#[test]
fn hyphens_inside_heading_words_are_kept() {
    let segmenter = SectionSegmenter::new().unwrap();
    let sections = segmenter.segment(
        "Clause 3: Non-Compete\nThe Supplier shall not compete for twelve months.",
    );

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "3: Non-Compete");

    let output = chunker()
        .chunk("Clause 3: Non-Compete\nThe Supplier shall not compete for twelve months.")
        .unwrap();
    assert_eq!(output.clauses[0].clause_id, "clause-3");
    assert_eq!(output.clauses[0].clause_title, ": Non-Compete");
}

#[test]
fn keyword_headings_are_normalized_into_titles() {
    let text = "\
SECTION 7 - NON-COMPETE
The Supplier shall not solicit the Client's staff for twelve months.";

    let output = chunker().chunk(text).unwrap();
    assert_eq!(output.clauses.len(), 1);
    assert_eq!(output.clauses[0].clause_id, "clause-7");
    assert_eq!(output.clauses[0].clause_title, "NON-COMPETE");
}

#[test]
fn segmenter_rewrites_keyword_heading_titles() {
    let segmenter = SectionSegmenter::new().unwrap();
    let sections = segmenter.segment("Section 5 - Termination\nEither party may terminate.");

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "5 — Termination");
    assert!(!sections[0].is_annex);
}

#[test]
fn text_without_headings_becomes_full_document() {
    let text = "The parties agree to cooperate in good faith on all matters.";
    let output = chunker().chunk(text).unwrap();

    assert_eq!(output.clauses.len(), 1);
    assert_eq!(output.clauses[0].clause_id, "section-1");
    assert_eq!(output.clauses[0].clause_title, FULL_DOCUMENT_TITLE);
    assert_eq!(output.clauses[0].clause_text, text);
}

#[test]
fn repeated_clause_numbers_get_unique_ids() {
    let text = "\
1. SCOPE
The first scope clause describes hosting services.
1. SCOPE
The second scope clause describes support services.
1. SCOPE
The third scope clause describes consulting services.";

    let output = chunker().chunk(text).unwrap();
    let ids = output
        .clauses
        .iter()
        .map(|clause| clause.clause_id.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(ids, vec!["clause-1", "clause-1-1", "clause-1-2"]);
}

#[test]
fn short_sections_are_dropped_and_order_is_kept() {
    let text = "\
1. DEFINITIONS
Short.
2. PAYMENT TERMS
Invoices are payable within thirty days.
3. TERMINATION
Either party may terminate on ninety days notice.";

    let output = chunker().chunk(text).unwrap();
    let ids = output
        .clauses
        .iter()
        .map(|clause| clause.clause_id.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(ids, vec!["clause-2", "clause-3"]);
    for clause in &output.clauses {
        assert!(clause.clause_text.chars().count() >= MIN_CLAUSE_CHARS);
        assert!(!clause.clause_id.is_empty());
    }
}

#[test]
fn clause_text_collapses_blank_runs() {
    let text = "1. SCOPE\nHosting services are included.\n\n\n\n\nSupport is excluded from scope.";
    let output = chunker().chunk(text).unwrap();

    assert_eq!(
        output.clauses[0].clause_text,
        "Hosting services are included.\n\nSupport is excluded from scope."
    );
}

#[test]
fn documents_without_usable_clauses_fail() {
    let chunker = chunker();
    assert_eq!(
        chunker.chunk("1. DEFINITIONS\nToo short.").unwrap_err(),
        ChunkError::NoMeaningfulClauses
    );
    assert_eq!(
        chunker.chunk("").unwrap_err(),
        ChunkError::NoMeaningfulClauses
    );
}
