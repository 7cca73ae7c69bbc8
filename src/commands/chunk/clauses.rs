use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use super::segment::RawSection;
use crate::error::ChunkError;
use crate::model::ClauseChunk;

/// Sections with less body text than this are treated as noise.
pub const MIN_CLAUSE_CHARS: usize = 20;

#[derive(Debug)]
pub struct ClauseBuilder {
    excess_newlines: Regex,
    clause_number: Regex,
    annex_designator: Regex,
    leading_number: Regex,
    leading_dash: Regex,
}

impl ClauseBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            excess_newlines: Regex::new(r"\n{3,}")
                .context("failed to compile newline collapse regex")?,
            clause_number: Regex::new(r"^([0-9]+[A-Z]?)")
                .context("failed to compile clause number regex")?,
            annex_designator: Regex::new(r"(?i)(?:annex|schedule|appendix)\s+([A-Z0-9]+)")
                .context("failed to compile annex designator regex")?,
            leading_number: Regex::new(r"^[0-9]+\.?\s*")
                .context("failed to compile title number regex")?,
            leading_dash: Regex::new(r"^[—–-]\s*").context("failed to compile title dash regex")?,
        })
    }

    pub fn build(&self, sections: &[RawSection]) -> Result<Vec<ClauseChunk>, ChunkError> {
        let mut used_ids = HashSet::<String>::new();
        let mut clauses = Vec::<ClauseChunk>::with_capacity(sections.len());

        for (index, section) in sections.iter().enumerate() {
            let text = self.section_text(section);
            if text.chars().count() < MIN_CLAUSE_CHARS {
                debug!(title = %section.title, chars = text.chars().count(), "dropped short section");
                continue;
            }

            let clause_id = claim_unique_id(self.clause_id(index, section), index, &mut used_ids);
            clauses.push(ClauseChunk {
                clause_id,
                clause_title: self.clean_title(&section.title),
                clause_text: text,
            });
        }

        if clauses.is_empty() {
            return Err(ChunkError::NoMeaningfulClauses);
        }

        Ok(clauses)
    }

    fn section_text(&self, section: &RawSection) -> String {
        let joined = section.lines.join("\n");
        self.excess_newlines
            .replace_all(&joined, "\n\n")
            .trim()
            .to_string()
    }

    /// `clause-14a` for numbered titles, `annex-b` for annexes, otherwise
    /// `section-<position>`.
    fn clause_id(&self, index: usize, section: &RawSection) -> String {
        if let Some(captures) = self.clause_number.captures(&section.title) {
            if let Some(number) = captures.get(1) {
                return format!("clause-{}", number.as_str().to_lowercase());
            }
        }

        if section.is_annex {
            let designator = self
                .annex_designator
                .captures(&section.title)
                .and_then(|captures| captures.get(1))
                .map(|value| value.as_str().to_lowercase())
                .unwrap_or_else(|| index.to_string());
            return format!("annex-{designator}");
        }

        format!("section-{}", index + 1)
    }

    fn clean_title(&self, raw: &str) -> String {
        let without_number = self.leading_number.replace(raw, "");
        let without_dash = self.leading_dash.replace(&without_number, "");
        let cleaned = without_dash.split_whitespace().collect::<Vec<&str>>().join(" ");

        if cleaned.is_empty() {
            raw.to_string()
        } else {
            cleaned
        }
    }
}

/// Suffixes a colliding id with the section position, then a counter if the
/// suffixed id is taken as well.
fn claim_unique_id(candidate: String, index: usize, used_ids: &mut HashSet<String>) -> String {
    let mut id = candidate;
    if used_ids.contains(&id) {
        let base = format!("{id}-{index}");
        id = base.clone();
        let mut counter = 2usize;
        while used_ids.contains(&id) {
            id = format!("{base}-{counter}");
            counter += 1;
        }
        debug!(id = %id, "disambiguated clause id");
    }

    used_ids.insert(id.clone());
    id
}
