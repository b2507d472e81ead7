use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docqa_core::config::{Config, EmbeddingBackend, Settings};
use docqa_core::traits::Embedder;
use docqa_embed::embedder_from_settings;
use docqa_generate::OllamaGenerator;
use docqa_retriever::{Assistant, Retriever};

#[derive(Debug, Parser)]
#[command(name = "docqa", about = "Ask questions about a local PDF or DOCX document")]
struct Cli {
    /// Use the hashing embedder instead of the BGE-M3 model.
    #[arg(long, global = true)]
    fake_embeddings: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract, chunk and index a document, replacing the current index.
    Ingest { file: PathBuf },
    /// Show the chunks most similar to a query.
    Search {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Print the context window that would be sent to the model.
    Context {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long)]
        context_size: Option<usize>,
    },
    /// Answer a question with the configured Ollama model.
    Ask { question: String },
}

/// `ingest` rebuilds from scratch, so it skips loading the saved index and
/// can overwrite a corrupt one. Every other command needs the saved index.
fn session(command: &Command, embedder: Box<dyn Embedder>, settings: &Settings) -> docqa_core::Result<Retriever> {
    match command {
        Command::Ingest { .. } => Retriever::new(embedder, settings),
        _ => Retriever::open(embedder, settings),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let mut settings = config.settings()?;
    if cli.fake_embeddings { settings.embedding.backend = EmbeddingBackend::Hash; }

    let embedder = embedder_from_settings(&settings.embedding)?;
    let mut retriever = session(&cli.command, embedder, &settings)?;

    match cli.command {
        Command::Ingest { file } => {
            let count = retriever.ingest_file(&file).with_context(|| format!("ingesting {}", file.display()))?;
            println!("Ingested {} ({} chunks) into {}", file.display(), count, retriever.index_dir().display());
        }
        Command::Search { query, top_k } => {
            let hits = retriever.search_scored(&query, top_k.unwrap_or(settings.retrieval.top_k))?;
            if hits.is_empty() { println!("No results."); }
            for (i, hit) in hits.iter().enumerate() {
                println!("\n{}. score={:.4}  chunk=#{}", i + 1, hit.score, hit.ordinal);
                println!("   {}", docqa_retriever::trim(&hit.text, 200));
            }
        }
        Command::Context { query, top_k, context_size } => {
            let context = retriever.build_context(
                &query,
                top_k.unwrap_or(settings.retrieval.top_k),
                context_size.unwrap_or(settings.retrieval.context_size),
            )?;
            println!("{context}");
        }
        Command::Ask { question } => {
            let generator = OllamaGenerator::new(&settings.generation)?;
            let assistant = Assistant::new(retriever, generator);
            println!("{}", assistant.ask(&question)?);
        }
    }
    Ok(())
}
