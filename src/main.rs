use docent::cli::{Cli, Commands, ConfigAction, PipelineArgs};
use docent::config::Config;
use docent::embedding;
use docent::error::{DocentError, Result};
use docent::generation::{Generation, GenerationError, GenerationParams, Generator};
use docent::ingest::{Chunk, PdfLoader};
use docent::session::{Report, Role};
use docent::{Pipeline, PipelineConfig, Services, Session};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Handle commands
    match cli.command {
        Commands::Ask {
            pdf,
            question,
            sources,
            pipeline,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_ask(&config, &pdf, &question, sources, &pipeline)?;
        }
        Commands::Report {
            pdf,
            output,
            instructions,
            print,
            pipeline,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_report(&config, &pdf, output, instructions.as_deref(), print, &pipeline)?;
        }
        Commands::Chat { pdf, pipeline } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_chat(&config, &pdf, &pipeline)?;
        }
        Commands::Prompt {
            pdf,
            question,
            report,
            instructions,
            pipeline,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            let request = if report {
                PromptRequest::Report(instructions)
            } else {
                PromptRequest::Question(question.unwrap_or_default())
            };
            cmd_prompt(&config, &pdf, request, &pipeline)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "docent=debug" } else { "docent=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn pipeline_config(config: &Config, args: &PipelineArgs) -> PipelineConfig {
    let mut pipeline = config.pipeline.clone();
    args.apply(&mut pipeline);
    pipeline
}

/// Open `pdf` in a fresh session and build its pipeline
fn open_session(config: &Config, pdf: &Path, args: &PipelineArgs) -> Result<Session> {
    let services = Services::from_config(config)?;
    let mut session = Session::new(services);

    let document = session.open_document(pdf)?;
    println!("✓ Loaded {} ({} pages)", document.name, document.page_count());

    session.configure(pipeline_config(config, args))?;
    if let Some(pipeline) = session.pipeline() {
        println!("✓ Indexed {} chunks", pipeline.chunk_count());
    }

    Ok(session)
}

fn cmd_ask(
    config: &Config,
    pdf: &Path,
    question: &str,
    show_sources: bool,
    args: &PipelineArgs,
) -> Result<()> {
    let mut session = open_session(config, pdf, args)?;
    let answer = session.ask(question)?;

    println!("\n{}", answer.text);
    if answer.truncated {
        println!("\n⚠ Answer was cut off at the token limit");
    }
    if show_sources {
        print_sources(&answer.sources);
    }

    session.close();
    Ok(())
}

fn cmd_report(
    config: &Config,
    pdf: &Path,
    output: Option<PathBuf>,
    instructions: Option<&str>,
    print: bool,
    args: &PipelineArgs,
) -> Result<()> {
    let session = open_session(config, pdf, args)?;
    let report = session.generate_report(instructions)?;
    emit_report(config, &report, output, print)?;
    session.close();
    Ok(())
}

fn emit_report(config: &Config, report: &Report, output: Option<PathBuf>, print: bool) -> Result<()> {
    if print {
        println!("\n{}", report.text);
    } else {
        let dir = output.unwrap_or_else(|| config.output.report_dir.clone());
        let path = report.save(&expand_path(&dir)?)?;
        println!("✓ Report saved to {}", path.display());
    }

    if report.truncated {
        println!("⚠ Report was cut off at the token limit");
    }
    Ok(())
}

fn cmd_chat(config: &Config, pdf: &Path, args: &PipelineArgs) -> Result<()> {
    let mut session = open_session(config, pdf, args)?;

    println!("Ask about the document. Commands: /report [instructions], /history, /quit");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let line = match lines.next() {
            Some(line) => line.map_err(|e| DocentError::Io {
                source: e,
                context: "Failed to read from stdin".to_string(),
            })?,
            None => break,
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                for turn in session.conversation().turns() {
                    let who = match turn.role {
                        Role::User => "you",
                        Role::Assistant => "docent",
                    };
                    println!("[{}] {}: {}", turn.at.format("%H:%M:%S"), who, turn.content);
                }
            }
            _ if line.starts_with("/report") => {
                let extra = line.trim_start_matches("/report").trim();
                let extra = (!extra.is_empty()).then_some(extra);
                match session.generate_report(extra) {
                    Ok(report) => emit_report(config, &report, None, false)?,
                    Err(e) => eprintln!("✗ {}", e),
                }
            }
            question => match session.ask(question) {
                Ok(answer) => {
                    println!("\n{}\n", answer.text);
                    if answer.truncated {
                        println!("⚠ Answer was cut off at the token limit\n");
                    }
                }
                // Keep the loop alive; the question stays in the history
                Err(e) => eprintln!("✗ {}", e),
            },
        }
    }

    session.close();
    Ok(())
}

enum PromptRequest {
    Question(String),
    Report(Option<String>),
}

fn cmd_prompt(config: &Config, pdf: &Path, request: PromptRequest, args: &PipelineArgs) -> Result<()> {
    let document = PdfLoader::load_path(pdf)?;

    // The configured generator is never called, so no API key is needed for it
    let services = Services {
        embedder: embedding::provider_from_config(&config.embedding)?,
        generator: Arc::new(OfflineGenerator),
        max_tokens: config.llm.max_tokens,
        embed_batch_size: config.embedding.batch_size,
    };
    let pipeline = Pipeline::build(&document, pipeline_config(config, args), &services)?;

    let prepared = match request {
        PromptRequest::Question(question) => pipeline.prepare(&question)?,
        PromptRequest::Report(extra) => pipeline.report_prompt(extra.as_deref())?,
    };

    println!("{}", prepared.prompt);
    print_sources(&prepared.sources);
    Ok(())
}

/// Stand-in generator for commands that only compose prompts
struct OfflineGenerator;

impl Generator for OfflineGenerator {
    fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> std::result::Result<Generation, GenerationError> {
        Err(GenerationError::InitializationError(
            "no generator in prompt-only mode".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        "offline"
    }
}

fn print_sources(sources: &[Chunk]) {
    eprintln!("\nSources:");
    for chunk in sources {
        let preview: String = chunk.text.chars().take(80).collect();
        eprintln!(
            "  [page {}, #{}] {}",
            chunk.page + 1,
            chunk.ordinal,
            preview.replace('\n', " ")
        );
    }
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
            println!("  Embedding: {} ({})", config.embedding.provider, config.embedding.model);
            println!("  LLM: {}", config.llm.model);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            // Create parent directory
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| DocentError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let mut config = Config::load_or_default(&path)?;
    if let Some(profile) = profile {
        config.apply_profile(&profile)?;
    }
    Ok(config)
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| DocentError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| DocentError::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}
