use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use futures::future;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::{PipelineError, ProviderError};
use crate::pipeline::{AnalysisOutcome, ImageCandidate};
use crate::providers::LabelProvider;
use crate::server::AppState;

// The combined probe keeps its search small for quicker manual testing.
const COMBINED_SEARCH_LIMIT: u32 = 3;

type HandlerError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Analyze endpoint: search images for the keyword and keep the ones whose
/// detected labels cover every requested label.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisOutcome>, HandlerError> {
    match state
        .pipeline
        .analyze(&request.keyword, &request.labels)
        .await
    {
        Ok(outcome) => Ok(Json(outcome)),
        Err(PipelineError::Validation(message)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid request", "errors": [message] })),
        )),
        Err(PipelineError::Search(cause)) => {
            error!(
                "Image search failed for keyword {:?}: {}",
                request.keyword, cause
            );
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "message": "Image search is currently unavailable" })),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchProbeParams {
    keyword: String,
    limit: u32,
}

/// Search-only probe, exercises the photo search provider by itself.
pub async fn search_probe(
    State(state): State<AppState>,
    Query(params): Query<SearchProbeParams>,
) -> Result<Json<Value>, HandlerError> {
    if params.keyword.trim().is_empty() {
        return Err(probe_rejection("keyword must not be empty"));
    }
    if params.limit == 0 {
        return Err(probe_rejection("limit must be at least 1"));
    }

    match state.search.search(&params.keyword, params.limit).await {
        Ok(photos) => Ok(Json(json!({
            "success": true,
            "keyword": params.keyword,
            "count": photos.len(),
            "photos": photos,
        }))),
        Err(cause) => {
            error!("Search probe failed for {:?}: {}", params.keyword, cause);
            Err(probe_failure(cause))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LabelProbeParams {
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

/// Label-lookup-only probe, exercises the label provider by itself.
pub async fn label_probe(
    State(state): State<AppState>,
    Query(params): Query<LabelProbeParams>,
) -> Result<Json<Value>, HandlerError> {
    let image_url = match params.image_url {
        Some(url) if !url.trim().is_empty() => url,
        _ => return Err(probe_rejection("Missing required query parameter: imageUrl")),
    };

    match state.labels.detect_labels(&image_url).await {
        Ok(labels) => Ok(Json(json!({
            "success": true,
            "imageUrl": image_url,
            "labelsCount": labels.len(),
            "labels": labels,
        }))),
        Err(cause) => {
            error!("Label probe failed for {}: {}", image_url, cause);
            Err(probe_failure(cause))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CombinedProbeParams {
    keyword: Option<String>,
    label: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CombinedImageResult {
    image_url: String,
    detected: bool,
    all_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Combined probe: a small search followed by a label check per image.
/// Per-image lookup failures show up as entries with an error message
/// instead of failing the probe.
pub async fn combined_probe(
    State(state): State<AppState>,
    Query(params): Query<CombinedProbeParams>,
) -> Result<Json<Value>, HandlerError> {
    let keyword = params.keyword.unwrap_or_else(|| "city".to_string());
    let search_label = params
        .label
        .unwrap_or_else(|| "building".to_string())
        .to_lowercase();

    let photos = match state.search.search(&keyword, COMBINED_SEARCH_LIMIT).await {
        Ok(photos) => photos,
        Err(cause) => {
            error!("Combined probe search failed for {:?}: {}", keyword, cause);
            return Err(probe_failure(cause));
        }
    };

    if photos.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": format!("No images found for keyword: {}", keyword),
            })),
        ));
    }

    let checks = photos
        .iter()
        .map(|photo| check_candidate(state.labels.as_ref(), photo, &search_label));
    let results = future::join_all(checks).await;

    let images_with_label = results.iter().filter(|result| result.detected).count();
    Ok(Json(json!({
        "success": true,
        "keyword": keyword,
        "searchLabel": search_label,
        "imagesTested": results.len(),
        "imagesWithLabel": images_with_label,
        "results": results,
    })))
}

async fn check_candidate(
    labels: &dyn LabelProvider,
    candidate: &ImageCandidate,
    search_label: &str,
) -> CombinedImageResult {
    match labels.detect_labels(&candidate.access_url).await {
        Ok(detected_labels) => CombinedImageResult {
            image_url: candidate.access_url.clone(),
            detected: detected_labels.iter().any(|label| label == search_label),
            all_labels: detected_labels,
            error: None,
        },
        Err(cause) => {
            warn!("Label lookup failed for image {}: {}", candidate.id, cause);
            CombinedImageResult {
                image_url: candidate.access_url.clone(),
                detected: false,
                all_labels: Vec::new(),
                error: Some(cause.to_string()),
            }
        }
    }
}

/// Liveness check.
pub async fn health() -> &'static str {
    "OK"
}

fn probe_rejection(message: &str) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message })),
    )
}

fn probe_failure(cause: ProviderError) -> HandlerError {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "success": false, "error": cause.to_string() })),
    )
}
