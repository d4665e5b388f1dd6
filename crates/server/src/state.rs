use lectern_core::config::ServerConfig;
use lectern_study::StudyPipeline;

/// Immutable per-process state shared by every handler.
pub struct AppState {
    pub pipeline: StudyPipeline,
    pub server: ServerConfig,
}
