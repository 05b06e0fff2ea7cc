pub mod analyzer;
pub mod matcher;
mod types;

pub use analyzer::{AnalysisPipeline, AnalysisPipelineBuilder};
pub use matcher::covers_requested;
pub use types::{AnalysisOutcome, ImageCandidate, MatchResult};
