pub mod unsplash;
pub mod vision;

pub use unsplash::UnsplashClient;
pub use vision::VisionClient;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::pipeline::ImageCandidate;

/// Keyword search against an external photo catalog.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<ImageCandidate>, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Label detection for a single image, addressed by URL.
///
/// Implementations return labels lowercased with empty entries dropped, so
/// the matcher can compare them without renormalizing.
#[async_trait]
pub trait LabelProvider: Send + Sync {
    async fn detect_labels(&self, image_url: &str) -> Result<Vec<String>, ProviderError>;

    fn name(&self) -> &'static str;
}
