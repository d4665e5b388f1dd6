pub mod fallback;
pub mod normalize;
pub mod pipeline;

pub use fallback::fallback;
pub use normalize::normalize;
pub use pipeline::{FlashcardsResponse, QuizOutcome, SlidesResponse, StudyPipeline, SummaryOutcome};
