use std::collections::HashMap;

use serde_json::Value;
use tracing::{info, warn};

use super::session::ModelSession;
use super::validation::{
    REASONING_PLACEHOLDER, RECOMMENDATION_PLACEHOLDER, text_or_placeholder, validate_category,
    validate_severity,
};
use crate::error::PipelineError;
use crate::model::{AnalysedClause, ClauseCategory, ClauseChunk, Severity};

const ANALYSIS_TEMPERATURE: f32 = 0.2;
const PROMPT_CLAUSE_CHARS: usize = 2000;

const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are a senior contract risk analyst and commercial negotiation advisor specialising in UK commercial contracts.

For EACH contract clause provided, produce all of the following in a single pass:

1. CATEGORY: exactly ONE of
   liability, IP, termination, payment, change_control, confidentiality, data_protection, indemnity, warranties, governing_law, insurance, other

2. SEVERITY, scored from the CLIENT's perspective:
   - High: significant financial, legal or operational exposure (liability cap far below contract value, unlimited indemnity, overly broad IP assignment)
   - Medium: potentially unfavourable but not immediately dangerous (auto-renewal, moderately long payment terms)
   - Low: standard commercial practice with minimal risk (standard confidentiality, reasonable warranties)

3. REASONING: a 1-2 sentence risk explanation that cites the actual values, timeframes or percentages in the clause.

4. RECOMMENDATION: a specific negotiation action.
   - Reference actual values, percentages and timeframes
   - Suggest concrete alternative language or thresholds
   - For low-risk clauses, briefly confirm acceptability

SCORING RULES:
- Assess a liability cap relative to the contract value
- Payment terms of 90 days are worse than 30 days
- IP assignment capturing pre-existing tools is HIGH risk
- Termination with only 7 days to cure is HIGH risk
- Exclusion of indirect or consequential losses favours the supplier

Respond ONLY with valid JSON. No markdown.";

/// Classifies, scores and recommends every clause with one model call.
/// Output order follows `clauses`.
pub fn analyse(
    session: &ModelSession<'_>,
    clauses: &[ClauseChunk],
) -> Result<Vec<AnalysedClause>, PipelineError> {
    let request = session.request(
        ANALYSIS_TEMPERATURE,
        ANALYSIS_SYSTEM_PROMPT,
        build_analysis_prompt(clauses),
    );
    let content = session.complete(&request, "analysis")?;
    let analysed = parse_analysis(&content, clauses)?;

    info!(clauses = analysed.len(), "clause analysis completed");
    Ok(analysed)
}

pub fn build_analysis_prompt(clauses: &[ClauseChunk]) -> String {
    let clause_list = clauses
        .iter()
        .map(|clause| {
            let excerpt = clause
                .clause_text
                .chars()
                .take(PROMPT_CLAUSE_CHARS)
                .collect::<String>();
            format!(
                "[{}] \"{}\"\n{}",
                clause.clause_id, clause.clause_title, excerpt
            )
        })
        .collect::<Vec<String>>()
        .join("\n\n---\n\n");

    format!(
        "Analyse each clause below. Return JSON:\n\
{{\"analysis\": [{{\"clause_id\": \"...\", \"category\": \"...\", \"severity\": \"High|Medium|Low\", \"reasoning\": \"...\", \"recommendation\": \"...\"}}]}}\n\n\
Clauses:\n\n{clause_list}"
    )
}

pub fn parse_analysis(
    content: &str,
    clauses: &[ClauseChunk],
) -> Result<Vec<AnalysedClause>, PipelineError> {
    let parsed: Value = serde_json::from_str(content).map_err(|_| {
        PipelineError::MalformedResponse("Failed to parse analysis response as JSON".to_string())
    })?;

    let mut results = HashMap::<&str, &Value>::new();
    if let Some(items) = parsed.get("analysis").and_then(Value::as_array) {
        for item in items {
            if let Some(clause_id) = item.get("clause_id").and_then(Value::as_str) {
                results.insert(clause_id, item);
            }
        }
    }

    let missing = clauses
        .iter()
        .filter(|clause| !results.contains_key(clause.clause_id.as_str()))
        .count();
    if missing > 0 {
        warn!(missing, "model returned no analysis for some clauses");
    }

    Ok(clauses
        .iter()
        .map(|clause| {
            let item = results.get(clause.clause_id.as_str()).copied();
            enrich(clause.clone(), item)
        })
        .collect())
}

fn enrich(chunk: ClauseChunk, item: Option<&Value>) -> AnalysedClause {
    let field = |name: &str| string_field(item, name);

    let category = match item {
        Some(_) => validate_category(field("category").unwrap_or_default()),
        None => ClauseCategory::Other,
    };
    let severity = match item {
        Some(_) => validate_severity(field("severity").unwrap_or_default()),
        None => Severity::Medium,
    };

    chunk
        .classify(category)
        .score(
            severity,
            text_or_placeholder(field("reasoning"), REASONING_PLACEHOLDER),
        )
        .recommend(text_or_placeholder(
            field("recommendation"),
            RECOMMENDATION_PLACEHOLDER,
        ))
}

fn string_field<'v>(item: Option<&'v Value>, name: &str) -> Option<&'v str> {
    item.and_then(|value| value.get(name))
        .and_then(Value::as_str)
}
