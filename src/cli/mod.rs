//! CLI command definitions and parsing
use crate::pipeline::PipelineConfig;
use crate::prompt::ReportType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "docent",
    version,
    author = "neur0map",
    about = "Document-grounded Q&A and business report writer for PDF files",
    long_about = "Docent loads a PDF, splits and embeds its text into an in-memory index, and answers \
                  questions or writes structured Korean business reports using only the retrieved \
                  passages as context."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/docent/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Profile to apply (e.g., "precise", "broad")
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask one question about a PDF
    Ask {
        /// PDF file to read
        pdf: PathBuf,

        /// Question to ask
        question: String,

        /// Also print the retrieved chunks
        #[arg(long)]
        sources: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Generate a structured report from a PDF
    Report {
        /// PDF file to read
        pdf: PathBuf,

        /// Directory to write the report into (defaults to output.report_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Additional instructions appended to the report template
        #[arg(short, long)]
        instructions: Option<String>,

        /// Print the report instead of saving it
        #[arg(long)]
        print: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Interactive question/answer loop over a PDF
    Chat {
        /// PDF file to read
        pdf: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Print the prompt that would be sent, without calling the model
    Prompt {
        /// PDF file to read
        pdf: PathBuf,

        /// Question to compose a prompt for
        #[arg(required_unless_present = "report", conflicts_with = "report")]
        question: Option<String>,

        /// Show the report-generation prompt instead
        #[arg(long)]
        report: bool,

        /// Additional report instructions (with --report)
        #[arg(short, long, requires = "report")]
        instructions: Option<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Per-run overrides of the configured pipeline settings
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Report type label (업무 보고서, 회의록 요약, 프로젝트 현황, 데이터 분석 보고서, or aliases
    /// business, meeting, project, data)
    #[arg(short = 't', long)]
    pub report_type: Option<String>,

    /// Maximum chunk length in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Number of chunks retrieved per question
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Sampling temperature between 0.0 and 1.0
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl PipelineArgs {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(label) = &self.report_type {
            config.report_type = ReportType::from_label(label);
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(chunk_overlap) = self.chunk_overlap {
            config.chunk_overlap = chunk_overlap;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
