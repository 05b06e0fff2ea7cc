use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Pipeline Error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Failed to bind to {1}: {0}")]
    Bind(std::io::Error, String),
    #[error("Server Error: {0}")]
    Server(std::io::Error),
}

// Errors surfaced by the analysis pipeline. Per-image lookup failures are
// not represented here: they are recovered inside the pipeline and the
// affected image is dropped from the result.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Image search failed: {0}")]
    Search(#[from] ProviderError),
}

// Upstream Provider Error Type
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to reach provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Provider reported an error: {0}")]
    Api(String),
    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}
