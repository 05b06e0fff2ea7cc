use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::providers::LabelProvider;

const VISION_API_URL: &str = "https://vision.googleapis.com";
// The provider's own default cap, made explicit on the wire.
const MAX_LABEL_RESULTS: u32 = 10;

/// Google Vision label detection, `POST /v1/images:annotate` with an API
/// key, one `LABEL_DETECTION` request per call addressing the image by URL.
pub struct VisionClient {
    http: reqwest::Client,
    api_key: String,
}

impl VisionClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl LabelProvider for VisionClient {
    async fn detect_labels(&self, image_url: &str) -> Result<Vec<String>, ProviderError> {
        debug!("Detecting labels for image {}", image_url);

        let request = AnnotateBatchRequest::label_detection(image_url);
        let response = self
            .http
            .post(format!("{}/v1/images:annotate", VISION_API_URL))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_annotate_response(&body)
    }

    fn name(&self) -> &'static str {
        "GoogleVision"
    }
}

fn parse_annotate_response(body: &str) -> Result<Vec<String>, ProviderError> {
    let batch: AnnotateBatchResponse =
        serde_json::from_str(body).map_err(|error| ProviderError::Decode(error.to_string()))?;

    let annotated = batch
        .responses
        .into_iter()
        .next()
        .ok_or(ProviderError::Decode(
            "annotate response contained no entries".to_string(),
        ))?;

    if let Some(error) = annotated.error {
        return Err(ProviderError::Api(error.message));
    }

    // Lowercased and cleared of empties so the matcher can compare directly.
    Ok(annotated
        .label_annotations
        .into_iter()
        .map(|annotation| annotation.description.to_lowercase())
        .filter(|description| !description.is_empty())
        .collect())
}

#[derive(Debug, Serialize)]
struct AnnotateBatchRequest {
    requests: Vec<AnnotateRequest>,
}

impl AnnotateBatchRequest {
    fn label_detection(image_url: &str) -> Self {
        Self {
            requests: vec![AnnotateRequest {
                image: RemoteImage {
                    source: RemoteImageSource {
                        image_uri: image_url.to_string(),
                    },
                },
                features: vec![Feature {
                    kind: "LABEL_DETECTION".to_string(),
                    max_results: MAX_LABEL_RESULTS,
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    image: RemoteImage,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct RemoteImage {
    source: RemoteImageSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteImageSource {
    image_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: String,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateBatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    error: Option<RemoteStatus>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RemoteStatus {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_label_descriptions() {
        let body = r#"{
            "responses": [{
                "labelAnnotations": [
                    {"description": "Sky", "score": 0.98, "mid": "/m/01bqvp"},
                    {"description": "Building", "score": 0.95},
                    {"description": "", "score": 0.5},
                    {"description": "Street light", "score": 0.61}
                ]
            }]
        }"#;

        let labels = parse_annotate_response(body).expect("Failed to parse response");
        assert_eq!(labels, vec!["sky", "building", "street light"]);
    }

    #[test]
    fn per_response_error_fails_the_lookup() {
        let body = r#"{
            "responses": [{
                "error": {"code": 7, "message": "We can not access the URL currently."}
            }]
        }"#;

        let error = parse_annotate_response(body).expect_err("Expected an API error");
        assert!(matches!(error, ProviderError::Api(_)));
    }

    #[test]
    fn missing_annotations_mean_no_labels() {
        let body = r#"{"responses": [{}]}"#;
        let labels = parse_annotate_response(body).expect("Failed to parse response");
        assert!(labels.is_empty());
    }

    #[test]
    fn empty_batch_is_a_decode_error() {
        let error = parse_annotate_response(r#"{"responses": []}"#)
            .expect_err("Expected a decode error");
        assert!(matches!(error, ProviderError::Decode(_)));
    }

    #[test]
    fn request_body_uses_the_vision_wire_names() {
        let request = AnnotateBatchRequest::label_detection("https://images.unsplash.com/abc");
        let body = serde_json::to_value(&request).expect("Failed to serialize request");

        assert_eq!(
            body["requests"][0]["image"]["source"]["imageUri"],
            "https://images.unsplash.com/abc"
        );
        assert_eq!(body["requests"][0]["features"][0]["type"], "LABEL_DETECTION");
        assert_eq!(body["requests"][0]["features"][0]["maxResults"], 10);
    }
}
