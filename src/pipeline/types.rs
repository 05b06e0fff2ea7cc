use serde::Serialize;

/// A single image reference returned by search, prior to label analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ImageCandidate {
    pub id: String,
    #[serde(rename = "image_url")]
    pub access_url: String,
}

impl ImageCandidate {
    pub fn new(id: impl Into<String>, access_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            access_url: access_url.into(),
        }
    }
}

/// An image whose detected labels cover every requested label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub image_url: String,
    pub labels: Vec<String>,
}

/// The result of one analysis run. An empty `matches` list is a normal
/// outcome, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub keyword: String,
    pub matches: Vec<MatchResult>,
}
