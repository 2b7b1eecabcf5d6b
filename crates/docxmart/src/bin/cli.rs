//! docXmart command line
//!
//! Run a task over a local file without starting the server.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use docxmart::{
    config::AppConfig,
    generation::{AssemblerOptions, AssemblyEvent, PromptBuilder, ResponseAssembler, TaskCatalog},
    ingestion::IngestPipeline,
    providers::build_generator,
};

#[derive(Parser)]
#[command(name = "docxmart")]
#[command(about = "Run curated LLM tasks over documents", version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a document with one task
    Run {
        /// Document to process (.txt, .md, .pdf, .docx)
        #[arg(short, long)]
        file: PathBuf,

        /// Task text, as printed by `docxmart tasks`
        #[arg(short, long)]
        task: String,

        /// Target language for translation tasks
        #[arg(short = 'l', long)]
        target_language: Option<String>,
    },
    /// List available tasks and translation targets
    Tasks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docxmart=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tasks => print_tasks(),
        Commands::Run {
            file,
            task,
            target_language,
        } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            config.validate()?;
            run(config, file, task, target_language).await?;
        }
    }

    Ok(())
}

fn print_tasks() {
    let catalog = TaskCatalog::default();

    for category in &catalog.categories {
        println!("{}", style(category.name).bold().cyan());
        for task in category.tasks {
            println!("  {}", task);
        }
        println!();
    }

    println!("{}", style("Target languages").bold().cyan());
    println!("  {}", catalog.target_languages.join(", "));
}

async fn run(
    config: AppConfig,
    file: PathBuf,
    task: String,
    target_language: Option<String>,
) -> anyhow::Result<()> {
    let selection = TaskCatalog::default().select(&task, target_language.as_deref())?;

    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let data = std::fs::read(&file)?;

    let pipeline = IngestPipeline::new(config.chunking.max_chunk_chars);
    let document = pipeline.ingest(&filename, None, &data)?;
    let chunks = pipeline.create_chunks(&document);

    eprintln!(
        "{} {} ({}, {} chars, {} chunks, language: {})",
        style("Loaded").green().bold(),
        document.filename,
        document.file_type.display_name(),
        document.char_count(),
        chunks.len(),
        document.language.name
    );

    let instructions = PromptBuilder::build_instructions(&selection, &document.language, &chunks);
    let generator = build_generator(&config.llm)?;
    let assembler = ResponseAssembler::new(AssemblerOptions::from_config(
        &config.assembly,
        &config.llm,
    ));

    let pb = ProgressBar::new(instructions.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let assembly = assembler
        .assemble(&instructions, generator.as_ref(), |event| match event {
            AssemblyEvent::Progress { .. } => pb.inc(1),
            AssemblyEvent::ChunkError(failure) => {
                pb.inc(1);
                pb.println(format!("{} {}", style("error").red().bold(), failure.message));
            }
            AssemblyEvent::Done { .. } => pb.finish_and_clear(),
        })
        .await;

    println!("{}", assembly.transcript.trim_end());

    if !assembly.failures.is_empty() {
        eprintln!(
            "{} {} of {} chunks failed",
            style("warning:").yellow().bold(),
            assembly.failures.len(),
            assembly.chunks
        );
    }

    Ok(())
}
