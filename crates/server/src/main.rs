mod api;
mod cli;
mod router;
mod state;

use std::sync::Arc;

use clap::Parser;
use lectern_llm::GenerationInvoker;
use lectern_study::StudyPipeline;
use tracing::info;

use crate::cli::{Cli, Command};

fn load_config() -> lectern_core::Config {
    lectern_core::config::load_dotenv();
    lectern_core::Config::from_env()
}

fn build_pipeline(config: &lectern_core::Config) -> StudyPipeline {
    let invoker = GenerationInvoker::from_config(&config.llm, &config.ollama);
    StudyPipeline::new(invoker, config.generation.clone())
}

async fn serve(config: lectern_core::Config) -> anyhow::Result<()> {
    let pipeline = build_pipeline(&config);
    info!(
        provider = pipeline.invoker().provider_name(),
        configured = pipeline.invoker().is_configured(),
        "Study pipeline ready"
    );

    let state = Arc::new(state::AppState {
        pipeline,
        server: config.server.clone(),
    });
    let app = router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://localhost:{}", config.server.port);
    info!("API docs at http://localhost:{}/docs", config.server.port);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config();
    config.log_summary();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await?,
        Command::Flashcards { topic, count } => {
            let pipeline = build_pipeline(&config);
            cli::flashcards(&pipeline, &topic, count).await?;
        }
        Command::Analyze {
            path,
            analysis_type,
            media_type,
        } => {
            let pipeline = build_pipeline(&config);
            cli::analyze(&pipeline, &path, &analysis_type, media_type.as_deref()).await?;
        }
    }

    Ok(())
}
