use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::pipeline::ImageCandidate;
use crate::providers::SearchProvider;

const UNSPLASH_API_URL: &str = "https://api.unsplash.com";

/// Unsplash photo search, `GET /search/photos` authenticated with a
/// `Client-ID` access key.
pub struct UnsplashClient {
    http: reqwest::Client,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(access_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_key,
        }
    }
}

#[async_trait]
impl SearchProvider for UnsplashClient {
    async fn search(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<ImageCandidate>, ProviderError> {
        debug!("Searching Unsplash for {:?}, limit {}", keyword, limit);

        let per_page = limit.to_string();
        let response = self
            .http
            .get(format!("{}/search/photos", UNSPLASH_API_URL))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Client-ID {}", self.access_key),
            )
            .query(&[("query", keyword), ("per_page", per_page.as_str())])
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

        let parsed = parse_search_response(&body)?;
        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "Unsplash"
    }
}

fn parse_search_response(body: &str) -> Result<Vec<ImageCandidate>, ProviderError> {
    let response: SearchPhotosResponse =
        serde_json::from_str(body).map_err(|error| ProviderError::Decode(error.to_string()))?;

    // Unsplash reports failures as an error list in the body.
    if let Some(message) = response.errors.into_iter().next() {
        return Err(ProviderError::Api(message));
    }

    Ok(response
        .results
        .into_iter()
        .map(|photo| ImageCandidate::new(photo.id, photo.urls.regular))
        .collect())
}

#[derive(Debug, Deserialize)]
struct SearchPhotosResponse {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    results: Vec<RemotePhoto>,
}

#[derive(Debug, Deserialize)]
struct RemotePhoto {
    id: String,
    urls: RemotePhotoUrls,
}

#[derive(Debug, Deserialize)]
struct RemotePhotoUrls {
    regular: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_results_into_candidates() {
        let body = r#"{
            "total": 2,
            "total_pages": 1,
            "results": [
                {"id": "abc", "urls": {"regular": "https://images.unsplash.com/abc", "small": "https://images.unsplash.com/abc?w=200"}},
                {"id": "def", "urls": {"regular": "https://images.unsplash.com/def"}}
            ]
        }"#;

        let candidates = parse_search_response(body).expect("Failed to parse response");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "abc");
        assert_eq!(candidates[0].access_url, "https://images.unsplash.com/abc");
        assert_eq!(candidates[1].id, "def");
    }

    #[test]
    fn error_list_fails_the_whole_search() {
        let body = r#"{"errors": ["OAuth error: The access token is invalid"]}"#;
        let error = parse_search_response(body).expect_err("Expected an API error");
        assert!(matches!(error, ProviderError::Api(_)));
    }

    #[test]
    fn empty_result_list_is_not_an_error() {
        let body = r#"{"total": 0, "total_pages": 0, "results": []}"#;
        let candidates = parse_search_response(body).expect("Failed to parse response");
        assert!(candidates.is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let error = parse_search_response("not json").expect_err("Expected a decode error");
        assert!(matches!(error, ProviderError::Decode(_)));
    }
}
