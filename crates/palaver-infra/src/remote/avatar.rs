//! Random dog avatar client.
//!
//! Fetches a random dog image URL from the Dog CEO API for newly created
//! chats. Failures degrade to placeholder image URLs, never to an error.

use palaver_core::remote::AvatarFetcher;
use serde::Deserialize;
use tracing::warn;

/// Dog CEO random image endpoint.
const DOG_API_BASE: &str = "https://dog.ceo/api/breeds/image/random";

/// Placeholder used when the API answered but the payload was not usable.
const FALLBACK_BAD_PAYLOAD: &str = "https://via.placeholder.com/150?text=Dog+URL+Error";

/// Placeholder used when the request itself failed.
const FALLBACK_REQUEST_FAILED: &str = "https://via.placeholder.com/150?text=API+Failed";

#[derive(Debug, Deserialize)]
struct DogApiResponse {
    status: String,
    message: Option<String>,
}

/// Avatar fetcher backed by the Dog CEO API.
pub struct DogApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl DogApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DOG_API_BASE.to_string())
    }

    /// Point the client at a different endpoint, used by tests.
    pub fn with_base_url(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("palaver/0.1")
            .build()
            .unwrap_or_default();
        Self { base_url, http }
    }
}

impl Default for DogApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Interprets a parsed API payload, falling back on anything unusable.
fn avatar_from_response(response: DogApiResponse) -> String {
    match response {
        DogApiResponse {
            status,
            message: Some(url),
        } if status == "success" && !url.is_empty() => url,
        _ => FALLBACK_BAD_PAYLOAD.to_string(),
    }
}

impl AvatarFetcher for DogApiClient {
    async fn fetch_avatar(&self) -> String {
        let response = match self.http.get(&self.base_url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "dog api request failed");
                return FALLBACK_REQUEST_FAILED.to_string();
            }
        };

        match response.json::<DogApiResponse>().await {
            Ok(payload) => avatar_from_response(payload),
            Err(e) => {
                warn!(error = %e, "dog api returned unparseable payload");
                return FALLBACK_BAD_PAYLOAD.to_string();
            }
        }
    }
}
