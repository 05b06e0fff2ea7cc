use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tracing::{debug, warn};

use crate::error::{AppError, PipelineError};
use crate::pipeline::matcher::covers_requested;
use crate::pipeline::types::{AnalysisOutcome, ImageCandidate, MatchResult};
use crate::providers::{LabelProvider, SearchProvider};

const DEFAULT_SEARCH_LIMIT: u32 = 10;
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Orchestrates one analysis run: search once, look up labels for every
/// candidate concurrently, keep the candidates whose labels cover the
/// request.
///
/// Providers are injected once at startup and shared across requests; the
/// pipeline itself holds no per-request state.
pub struct AnalysisPipeline {
    search: Arc<dyn SearchProvider>,
    labels: Arc<dyn LabelProvider>,
    search_limit: u32,
    lookup_timeout: Duration,
}

impl AnalysisPipeline {
    pub fn builder() -> AnalysisPipelineBuilder {
        AnalysisPipelineBuilder::new()
    }

    pub async fn analyze(
        &self,
        keyword: &str,
        requested_labels: &[String],
    ) -> Result<AnalysisOutcome, PipelineError> {
        validate_request(keyword, requested_labels)?;

        debug!(
            "Searching images for keyword {:?} via {}",
            keyword,
            self.search.name()
        );
        let candidates = self.search.search(keyword, self.search_limit).await?;
        debug!(
            "Search returned {} candidates for keyword {:?}",
            candidates.len(),
            keyword
        );

        // One lookup per candidate, all in flight at once. join_all keeps
        // the results in candidate order regardless of completion order.
        let lookups = candidates
            .iter()
            .map(|candidate| self.lookup_labels(candidate));
        let detected = future::join_all(lookups).await;

        let mut matches = Vec::new();
        for (candidate, detected_labels) in candidates.iter().zip(detected) {
            let Some(detected_labels) = detected_labels else {
                continue;
            };
            if covers_requested(&detected_labels, requested_labels) {
                matches.push(MatchResult {
                    image_url: candidate.access_url.clone(),
                    labels: detected_labels,
                });
            }
        }

        Ok(AnalysisOutcome {
            keyword: keyword.to_string(),
            matches,
        })
    }

    // A failed or timed-out lookup only drops its own image, never the run.
    async fn lookup_labels(&self, candidate: &ImageCandidate) -> Option<Vec<String>> {
        let lookup = self.labels.detect_labels(&candidate.access_url);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(detected)) => Some(detected),
            Ok(Err(error)) => {
                warn!(
                    "{} lookup failed for image {}: {}",
                    self.labels.name(),
                    candidate.id,
                    error
                );
                None
            }
            Err(_) => {
                warn!(
                    "Label lookup timed out for image {} after {:?}",
                    candidate.id, self.lookup_timeout
                );
                None
            }
        }
    }
}

fn validate_request(keyword: &str, requested_labels: &[String]) -> Result<(), PipelineError> {
    if keyword.trim().is_empty() {
        return Err(PipelineError::Validation(
            "keyword must not be empty".to_string(),
        ));
    }
    if requested_labels.is_empty() {
        return Err(PipelineError::Validation(
            "labels must not be empty".to_string(),
        ));
    }
    if requested_labels.iter().any(|label| label.trim().is_empty()) {
        return Err(PipelineError::Validation(
            "labels must not contain empty entries".to_string(),
        ));
    }
    Ok(())
}

pub struct AnalysisPipelineBuilder {
    search: Option<Arc<dyn SearchProvider>>,
    labels: Option<Arc<dyn LabelProvider>>,
    search_limit: u32,
    lookup_timeout: Duration,
}

impl AnalysisPipelineBuilder {
    pub fn new() -> Self {
        Self {
            search: None,
            labels: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn search_provider(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn label_provider(mut self, labels: Arc<dyn LabelProvider>) -> Self {
        self.labels = Some(labels);
        self
    }

    // Sets the search limit, this will override the default configuration.
    pub fn search_limit(mut self, search_limit: u32) -> Self {
        self.search_limit = search_limit;
        self
    }

    // Sets the per-lookup timeout, this will override the default configuration.
    pub fn lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    pub fn build(self) -> Result<AnalysisPipeline, AppError> {
        let search = self
            .search
            .ok_or(AppError::Config("Search provider not set".to_string()))?;
        let labels = self
            .labels
            .ok_or(AppError::Config("Label provider not set".to_string()))?;
        Ok(AnalysisPipeline {
            search,
            labels,
            search_limit: self.search_limit,
            lookup_timeout: self.lookup_timeout,
        })
    }
}

impl Default for AnalysisPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
