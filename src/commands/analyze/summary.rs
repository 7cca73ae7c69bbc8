use serde_json::Value;
use tracing::info;

use super::session::ModelSession;
use super::validation::{SUMMARY_PLACEHOLDER, text_or_placeholder};
use crate::error::PipelineError;
use crate::model::{AnalysedClause, ExecutiveSummary, SeverityCounts};

const SUMMARY_TEMPERATURE: f32 = 0.3;

const SUMMARY_SYSTEM_PROMPT: &str = "\
You are a senior contract risk advisor preparing an executive briefing for a non-legal project manager.

Produce a concise executive summary of the contract risk analysis. The summary should:

1. Be written in plain English with no legal jargon
2. State the overall risk posture
3. Highlight the red flags that need immediate attention
4. Prioritise which clauses to negotiate first
5. Help someone decide whether to sign or push back

The executive summary paragraph should be 3-5 sentences covering the overall risk level, the most dangerous clauses and why, and a clear recommendation on whether to sign as-is or negotiate.

Respond ONLY with valid JSON.";

pub fn summarize(
    session: &ModelSession<'_>,
    clauses: &[AnalysedClause],
) -> Result<ExecutiveSummary, PipelineError> {
    let request = session.request(
        SUMMARY_TEMPERATURE,
        SUMMARY_SYSTEM_PROMPT,
        build_summary_prompt(clauses),
    );
    let content = session.complete(&request, "summary")?;
    let summary = parse_summary(&content, clauses)?;

    info!(
        high = summary.total_high,
        medium = summary.total_medium,
        low = summary.total_low,
        red_flags = summary.key_red_flags.len(),
        "executive summary completed"
    );
    Ok(summary)
}

pub fn build_summary_prompt(clauses: &[AnalysedClause]) -> String {
    let counts = SeverityCounts::from_clauses(clauses);
    let clause_summaries = clauses
        .iter()
        .map(|clause| {
            format!(
                "[{}] {} | {} | {}\nRisk: {}\nRecommendation: {}",
                clause.chunk().clause_id,
                clause.chunk().clause_title,
                clause.category().as_str(),
                clause.severity().as_str(),
                clause.reasoning(),
                clause.recommendation
            )
        })
        .collect::<Vec<String>>()
        .join("\n\n");

    format!(
        "Produce an executive summary of this contract risk analysis.\n\n\
Risk distribution: {high} High, {medium} Medium, {low} Low\n\n\
Analysed clauses:\n\n{clause_summaries}\n\n\
Return JSON:\n\
{{\n  \"total_high\": {high},\n  \"total_medium\": {medium},\n  \"total_low\": {low},\n  \
\"key_red_flags\": [\"3-5 most critical issues as short bullet points\"],\n  \
\"negotiation_priority\": [\"ordered list of clause IDs or titles to negotiate first\"],\n  \
\"executive_summary\": \"3-5 sentence plain-English summary for a project manager\"\n}}",
        high = counts.high,
        medium = counts.medium,
        low = counts.low,
    )
}

/// Counts missing from the response are recomputed from `clauses`.
pub fn parse_summary(
    content: &str,
    clauses: &[AnalysedClause],
) -> Result<ExecutiveSummary, PipelineError> {
    let parsed: Value = serde_json::from_str(content).map_err(|_| {
        PipelineError::MalformedResponse("Failed to parse summary response as JSON".to_string())
    })?;
    let counts = SeverityCounts::from_clauses(clauses);

    Ok(ExecutiveSummary {
        total_high: count_field(&parsed, "total_high").unwrap_or(counts.high),
        total_medium: count_field(&parsed, "total_medium").unwrap_or(counts.medium),
        total_low: count_field(&parsed, "total_low").unwrap_or(counts.low),
        key_red_flags: string_list(&parsed, "key_red_flags"),
        negotiation_priority: string_list(&parsed, "negotiation_priority"),
        executive_summary: text_or_placeholder(
            parsed.get("executive_summary").and_then(Value::as_str),
            SUMMARY_PLACEHOLDER,
        ),
    })
}

fn count_field(parsed: &Value, name: &str) -> Option<usize> {
    parsed
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|count| usize::try_from(count).ok())
}

fn string_list(parsed: &Value, name: &str) -> Vec<String> {
    parsed
        .get(name)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
