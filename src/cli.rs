use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_COOLDOWN_MS, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_RETRIES,
    DEFAULT_MIN_TEXT_CHARS, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(
    name = "clauserisk",
    version,
    about = "Contract clause extraction and risk analysis tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a contract and print the ingestion output.
    Ingest(IngestArgs),
    /// Split a contract into clause chunks without calling the model.
    Chunk(ChunkArgs),
    /// Run the full pipeline: chunking, clause analysis and executive summary.
    Analyze(AnalyzeArgs),
    /// Show the most recent analysis run manifests.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Contract file (PDF or UTF-8 text).
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    pub file: Option<PathBuf>,

    /// Contract text passed inline.
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_FILE_BYTES)]
    pub max_file_bytes: u64,

    #[arg(long, default_value_t = DEFAULT_MIN_TEXT_CHARS)]
    pub min_text_chars: usize,
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ChunkArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "CLAUSERISK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "CLAUSERISK_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    #[arg(long, default_value_t = DEFAULT_COOLDOWN_MS)]
    pub cooldown_ms: u64,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value = ".cache/clauserisk")]
    pub cache_root: PathBuf,

    #[arg(long, default_value_t = false)]
    pub no_manifest: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/clauserisk")]
    pub cache_root: PathBuf,

    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_accepts_inline_text_with_defaults() {
        let cli = Cli::try_parse_from([
            "clauserisk",
            "analyze",
            "--text",
            "This agreement is made between the parties named below.",
            "--api-key",
            "test-key",
        ])
        .expect("analyze args should parse");

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze command");
        };
        assert!(args.input.file.is_none());
        assert_eq!(args.model.api_key.as_deref(), Some("test-key"));
        assert_eq!(args.model.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(args.model.cooldown_ms, DEFAULT_COOLDOWN_MS);
        assert_eq!(args.input.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert!(!args.no_manifest);
    }

    #[test]
    fn file_and_text_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "clauserisk",
            "chunk",
            "--file",
            "contract.pdf",
            "--text",
            "inline",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn one_input_source_is_required() {
        let result = Cli::try_parse_from(["clauserisk", "ingest"]);
        assert!(result.is_err());
    }
}
