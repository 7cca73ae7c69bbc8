use anyhow::{Context, Result};
use regex::Regex;

const TITLE_CASE_MIN_CHARS: usize = 5;
const TITLE_CASE_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    KeywordSeparated,
    KeywordBare,
    NumberedTitleCase,
    NumberedUpperCase,
    Annex,
}

// First matching rule wins.
#[derive(Debug)]
pub struct HeadingDetector {
    keyword_separated: Regex,
    keyword_bare: Regex,
    numbered_title_case: Regex,
    numbered_upper_case: Regex,
    number_prefix: Regex,
    annex: Regex,
}

impl HeadingDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            keyword_separated: Regex::new(
                r"(?i)^(?:clause|section|part|article)\s+[0-9IVX]+[\s—–.:-]",
            )
            .context("failed to compile keyword heading regex")?,
            keyword_bare: Regex::new(r"(?i)^(?:clause|section|part|article)\s+[0-9IVX]+\s*$")
                .context("failed to compile bare keyword heading regex")?,
            numbered_title_case: Regex::new(
                r"^[0-9]{1,3}\.?\s+[A-Z][A-Za-z]+(?:[\s,&]+[A-Za-z]+)+\s*$",
            )
            .context("failed to compile title-case heading regex")?,
            numbered_upper_case: Regex::new(r"^[0-9]{1,3}\.?\s+[A-Z][A-Z\s,&]+$")
                .context("failed to compile upper-case heading regex")?,
            number_prefix: Regex::new(r"^[0-9]{1,3}\.?\s+")
                .context("failed to compile heading number prefix regex")?,
            annex: Regex::new(r"(?i)^(?:annex|schedule|appendix|exhibit)\s+[A-Z0-9]+")
                .context("failed to compile annex heading regex")?,
        })
    }

    pub fn main_rule(&self, line: &str) -> Option<HeadingKind> {
        if self.keyword_separated.is_match(line) {
            return Some(HeadingKind::KeywordSeparated);
        }
        if self.keyword_bare.is_match(line) {
            return Some(HeadingKind::KeywordBare);
        }
        if self.numbered_title_case.is_match(line) {
            let title_chars = self.number_prefix.replace(line, "").chars().count();
            if (TITLE_CASE_MIN_CHARS..=TITLE_CASE_MAX_CHARS).contains(&title_chars) {
                return Some(HeadingKind::NumberedTitleCase);
            }
        }
        if self.numbered_upper_case.is_match(line) {
            return Some(HeadingKind::NumberedUpperCase);
        }

        None
    }

    pub fn is_heading(&self, line: &str) -> bool {
        self.main_rule(line).is_some()
    }

    pub fn is_annex_heading(&self, line: &str) -> bool {
        self.annex.is_match(line)
    }

    pub fn classify(&self, line: &str) -> Option<HeadingKind> {
        self.main_rule(line).or_else(|| {
            if self.is_annex_heading(line) {
                Some(HeadingKind::Annex)
            } else {
                None
            }
        })
    }
}
