use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use super::heading::HeadingDetector;

pub const PREAMBLE_TITLE: &str = "PREAMBLE AND PARTIES";
pub const FULL_DOCUMENT_TITLE: &str = "FULL DOCUMENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub title: String,
    pub lines: Vec<String>,
    pub is_annex: bool,
}

impl RawSection {
    fn open(title: String, is_annex: bool) -> Self {
        Self {
            title,
            lines: Vec::new(),
            is_annex,
        }
    }

    fn synthetic(title: &str, lines: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            lines,
            is_annex: false,
        }
    }
}

/// Splits cleaned text into sections at heading lines.
#[derive(Debug)]
pub struct SectionSegmenter {
    detector: HeadingDetector,
    keyword_prefix: Regex,
    dash_separator: Regex,
}

impl SectionSegmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            detector: HeadingDetector::new()?,
            keyword_prefix: Regex::new(r"(?i)^(?:clause|section|part|article)\s+")
                .context("failed to compile heading keyword prefix regex")?,
            dash_separator: Regex::new(r"(^|\s)[—–-]\s*")
                .context("failed to compile heading dash separator regex")?,
        })
    }

    pub fn segment(&self, cleaned_text: &str) -> Vec<RawSection> {
        let mut sections = Vec::<RawSection>::new();
        let mut current: Option<RawSection> = None;
        let mut preamble_lines = Vec::<String>::new();

        for raw_line in cleaned_text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                match current.as_mut() {
                    Some(section) => section.lines.push(String::new()),
                    None => preamble_lines.push(String::new()),
                }
                continue;
            }

            let is_main_heading = self.detector.is_heading(line);
            let is_annex_heading = self.detector.is_annex_heading(line);

            if is_main_heading || is_annex_heading {
                if let Some(section) = current.take() {
                    sections.push(section);
                } else if has_content(&preamble_lines) {
                    sections.push(RawSection::synthetic(
                        PREAMBLE_TITLE,
                        std::mem::take(&mut preamble_lines),
                    ));
                }

                debug!(
                    heading = line,
                    rule = ?self.detector.classify(line),
                    annex = is_annex_heading,
                    "section opened"
                );
                current = Some(RawSection::open(self.heading_title(line), is_annex_heading));
                continue;
            }

            match current.as_mut() {
                Some(section) => section.lines.push(line.to_string()),
                None => preamble_lines.push(line.to_string()),
            }
        }

        if let Some(section) = current.take() {
            sections.push(section);
        }

        if sections.is_empty() && has_content(&preamble_lines) {
            sections.push(RawSection::synthetic(FULL_DOCUMENT_TITLE, preamble_lines));
        }

        sections
    }

    /// "SECTION 5 - Termination" becomes "5 — Termination".
    fn heading_title(&self, line: &str) -> String {
        let without_keyword = self.keyword_prefix.replace(line, "");
        self.dash_separator
            .replacen(&without_keyword, 1, "${1}— ")
            .into_owned()
    }
}

fn has_content(lines: &[String]) -> bool {
    lines.iter().any(|line| !line.trim().is_empty())
}
