use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Pdf,
    Text,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Pdf => "pdf",
            SourceType::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionMetadata {
    pub page_count: usize,
    pub source_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionOutput {
    pub cleaned_text: String,
    pub metadata: IngestionMetadata,
}

/// A clause as cut from the document. Later stages wrap it, never edit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseChunk {
    pub clause_id: String,
    pub clause_title: String,
    pub clause_text: String,
}

impl ClauseChunk {
    pub fn classify(self, category: ClauseCategory) -> ClassifiedClause {
        ClassifiedClause {
            chunk: self,
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingOutput {
    pub clauses: Vec<ClauseChunk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseCategory {
    #[serde(rename = "liability")]
    Liability,
    #[serde(rename = "IP")]
    Ip,
    #[serde(rename = "termination")]
    Termination,
    #[serde(rename = "payment")]
    Payment,
    #[serde(rename = "change_control")]
    ChangeControl,
    #[serde(rename = "confidentiality")]
    Confidentiality,
    #[serde(rename = "data_protection")]
    DataProtection,
    #[serde(rename = "indemnity")]
    Indemnity,
    #[serde(rename = "warranties")]
    Warranties,
    #[serde(rename = "governing_law")]
    GoverningLaw,
    #[serde(rename = "insurance")]
    Insurance,
    #[serde(rename = "other")]
    Other,
}

impl ClauseCategory {
    pub const ALL: [ClauseCategory; 12] = [
        ClauseCategory::Liability,
        ClauseCategory::Ip,
        ClauseCategory::Termination,
        ClauseCategory::Payment,
        ClauseCategory::ChangeControl,
        ClauseCategory::Confidentiality,
        ClauseCategory::DataProtection,
        ClauseCategory::Indemnity,
        ClauseCategory::Warranties,
        ClauseCategory::GoverningLaw,
        ClauseCategory::Insurance,
        ClauseCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClauseCategory::Liability => "liability",
            ClauseCategory::Ip => "IP",
            ClauseCategory::Termination => "termination",
            ClauseCategory::Payment => "payment",
            ClauseCategory::ChangeControl => "change_control",
            ClauseCategory::Confidentiality => "confidentiality",
            ClauseCategory::DataProtection => "data_protection",
            ClauseCategory::Indemnity => "indemnity",
            ClauseCategory::Warranties => "warranties",
            ClauseCategory::GoverningLaw => "governing_law",
            ClauseCategory::Insurance => "insurance",
            ClauseCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedClause {
    #[serde(flatten)]
    pub chunk: ClauseChunk,
    pub category: ClauseCategory,
}

impl ClassifiedClause {
    pub fn score(self, severity: Severity, reasoning: String) -> ScoredClause {
        ScoredClause {
            classified: self,
            severity,
            reasoning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredClause {
    #[serde(flatten)]
    pub classified: ClassifiedClause,
    pub severity: Severity,
    pub reasoning: String,
}

impl ScoredClause {
    pub fn recommend(self, recommendation: String) -> AnalysedClause {
        AnalysedClause {
            scored: self,
            recommendation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysedClause {
    #[serde(flatten)]
    pub scored: ScoredClause,
    pub recommendation: String,
}

impl AnalysedClause {
    pub fn chunk(&self) -> &ClauseChunk {
        &self.scored.classified.chunk
    }

    pub fn category(&self) -> ClauseCategory {
        self.scored.classified.category
    }

    pub fn severity(&self) -> Severity {
        self.scored.severity
    }

    pub fn reasoning(&self) -> &str {
        &self.scored.reasoning
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_clauses(clauses: &[AnalysedClause]) -> Self {
        let mut counts = Self::default();
        for clause in clauses {
            match clause.severity() {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub total_high: usize,
    pub total_medium: usize,
    pub total_low: usize,
    pub key_red_flags: Vec<String>,
    pub negotiation_priority: Vec<String>,
    pub executive_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub clauses: Vec<AnalysedClause>,
    pub summary: ExecutiveSummary,
}

/// Envelope written by `analyze`, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Success { success: bool, data: AnalysisResult },
    Failure { success: bool, status: u16, error: String },
}

impl AnalyzeResponse {
    pub fn success(data: AnalysisResult) -> Self {
        AnalyzeResponse::Success {
            success: true,
            data,
        }
    }

    pub fn failure(status: u16, error: String) -> Self {
        AnalyzeResponse::Failure {
            success: false,
            status,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub source_type: SourceType,
    pub sha256: String,
    pub byte_len: usize,
    pub page_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisCounts {
    pub clauses: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub model: String,
    pub source: Option<SourceFingerprint>,
    pub counts: AnalysisCounts,
    pub failed_stage: Option<String>,
    pub failure_reason: Option<String>,
    pub output_path: Option<String>,
}
