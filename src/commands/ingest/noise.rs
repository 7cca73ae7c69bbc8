use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use regex::Regex;

const REPEATED_LINE_MIN_CHARS: usize = 10;
const REPEATED_LINE_MIN_COUNT: usize = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoiseStats {
    pub repeated_lines_removed: usize,
    pub pattern_lines_removed: usize,
}

#[derive(Debug)]
pub struct NoiseFilter {
    rule_line: Regex,
    page_marker: Regex,
    page_counter: Regex,
    digit_run: Regex,
}

impl NoiseFilter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rule_line: Regex::new(r"^[-–—]{3,}$").context("failed to compile rule line regex")?,
            page_marker: Regex::new(r"(?i)^page\s+[0-9]+\s*(?:of\s+[0-9]+)?$")
                .context("failed to compile page marker regex")?,
            page_counter: Regex::new(r"^-- [0-9]+ of [0-9]+ --$")
                .context("failed to compile page counter regex")?,
            digit_run: Regex::new(r"[0-9]+").context("failed to compile digit run regex")?,
        })
    }

    pub fn clean(&self, raw_text: &str) -> String {
        self.clean_with_stats(raw_text).0
    }

    pub fn clean_with_stats(&self, raw_text: &str) -> (String, NoiseStats) {
        let lines = raw_text
            .split('\n')
            .map(normalize_line_whitespace)
            .collect::<Vec<String>>();

        let repeated = self.detect_repeated_lines(&lines);
        let mut stats = NoiseStats::default();
        let mut kept = Vec::<&str>::with_capacity(lines.len());

        for line in &lines {
            let mut current = line.as_str();

            if !current.is_empty() && repeated.contains(&self.repeat_key(current)) {
                stats.repeated_lines_removed += 1;
                current = "";
            } else if !current.is_empty() && self.is_pattern_noise(current) {
                stats.pattern_lines_removed += 1;
                current = "";
            }

            let previous_blank = kept.last().map(|line| line.is_empty()).unwrap_or(false);
            if current.is_empty() && previous_blank {
                continue;
            }
            kept.push(current);
        }

        (kept.join("\n").trim().to_string(), stats)
    }

    fn detect_repeated_lines(&self, lines: &[String]) -> HashSet<String> {
        let mut counts = HashMap::<String, usize>::new();
        for line in lines {
            if line.chars().count() <= REPEATED_LINE_MIN_CHARS {
                continue;
            }
            *counts.entry(self.repeat_key(line)).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .filter_map(|(key, count)| {
                if count >= REPEATED_LINE_MIN_COUNT {
                    Some(key)
                } else {
                    None
                }
            })
            .collect()
    }

    fn repeat_key(&self, line: &str) -> String {
        self.digit_run.replace_all(line, "#").to_lowercase()
    }

    fn is_pattern_noise(&self, line: &str) -> bool {
        self.rule_line.is_match(line)
            || self.page_marker.is_match(line)
            || self.page_counter.is_match(line)
            || line.starts_with('©')
    }
}

fn normalize_line_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<&str>>().join(" ")
}
