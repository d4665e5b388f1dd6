//! CLI argument parsing and the one-shot subcommands.
//!
//! `serve` is the default; `flashcards` and `analyze` run the pipeline once
//! and print the same JSON the HTTP API would return.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lectern_core::{AnalysisKind, RawDocument, RequestError};
use lectern_study::{FlashcardsResponse, SlidesResponse, StudyPipeline};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lectern-server", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Generate flashcards for a topic and print them as JSON.
    Flashcards {
        #[arg(long)]
        topic: String,
        /// Number of cards (clamped to the configured maximum).
        #[arg(long)]
        count: Option<usize>,
    },
    /// Summarize and/or quiz a local document and print the result as JSON.
    Analyze {
        path: PathBuf,
        /// summary, quiz, or both.
        #[arg(long = "type", default_value = "both")]
        analysis_type: String,
        /// Declared media type; guessed from the extension when omitted.
        #[arg(long)]
        media_type: Option<String>,
    },
}

pub async fn flashcards(pipeline: &StudyPipeline, topic: &str, count: Option<usize>) -> anyhow::Result<()> {
    let response = generate_flashcards(pipeline, topic, count).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub async fn analyze(
    pipeline: &StudyPipeline,
    path: &Path,
    analysis_type: &str,
    media_type: Option<&str>,
) -> anyhow::Result<()> {
    let response = analyze_file(pipeline, path, analysis_type, media_type).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn generate_flashcards(
    pipeline: &StudyPipeline,
    topic: &str,
    count: Option<usize>,
) -> anyhow::Result<FlashcardsResponse> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(RequestError::MissingTopic.into());
    }
    let count = pipeline.generation().flashcard_count(count);
    Ok(pipeline.flashcards(topic, count).await)
}

async fn analyze_file(
    pipeline: &StudyPipeline,
    path: &Path,
    analysis_type: &str,
    media_type: Option<&str>,
) -> anyhow::Result<SlidesResponse> {
    let kind: AnalysisKind = analysis_type.parse()?;
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let media_type = media_type.map(str::to_string).unwrap_or_else(|| guess_media_type(path).to_string());

    info!(path = %path.display(), size = bytes.len(), media_type = %media_type, "Analyzing local file");
    let raw = RawDocument::new(bytes, media_type, filename);
    Ok(pipeline.analyze(raw, kind).await)
}

fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") | Some("text") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
