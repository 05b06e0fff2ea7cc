pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod server;

pub use error::{AppError, PipelineError, ProviderError};

pub use config::Configuration;
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, ImageCandidate, MatchResult};
pub use server::{AppState, Server};
