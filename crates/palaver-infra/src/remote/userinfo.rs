//! Google userinfo client.
//!
//! Exchanges a Google OAuth access token for the subject's profile. Unlike
//! the avatar and quote clients this one must fail loudly: a rejected token
//! means the login cannot proceed.

use palaver_core::remote::UserInfoFetcher;
use palaver_types::error::AuthError;
use palaver_types::identity::UserProfile;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

/// Google OAuth2 userinfo endpoint.
const GOOGLE_USERINFO_BASE: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Userinfo fetcher backed by Google's OAuth2 endpoint.
pub struct GoogleUserInfoClient {
    base_url: String,
    http: reqwest::Client,
}

impl GoogleUserInfoClient {
    pub fn new() -> Self {
        Self::with_base_url(GOOGLE_USERINFO_BASE.to_string())
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

impl Default for GoogleUserInfoClient {
    fn default() -> Self {
        Self::new()
    }
}

fn profile_from_response(info: GoogleUserInfo) -> UserProfile {
    UserProfile {
        provider_id: info.sub,
        display_name: info.name.unwrap_or_default(),
        email: info.email.filter(|e| !e.is_empty()),
        avatar_url: info.picture.unwrap_or_default(),
    }
}

impl UserInfoFetcher for GoogleUserInfoClient {
    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        let response = self
            .http
            .get(&self.base_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("userinfo request failed: {e}")))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("google rejected access token");
                Err(AuthError::ProviderRejected)
            }
            status if !status.is_success() => Err(AuthError::Provider(format!(
                "userinfo returned status {status}"
            ))),
            _ => {
                let info = response
                    .json::<GoogleUserInfo>()
                    .await
                    .map_err(|e| AuthError::Provider(format!("invalid userinfo payload: {e}")))?;
                Ok(profile_from_response(info))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_maps_all_fields() {
        let info = GoogleUserInfo {
            sub: "108".to_string(),
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            picture: Some("https://lh3.example.com/a.png".to_string()),
        };
        let profile = profile_from_response(info);
        assert_eq!(profile.provider_id, "108");
        assert_eq!(profile.display_name, "Ada Lovelace");
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
        assert_eq!(profile.avatar_url, "https://lh3.example.com/a.png");
    }

    #[test]
    fn test_profile_tolerates_missing_optionals() {
        let info = GoogleUserInfo {
            sub: "108".to_string(),
            name: None,
            email: Some(String::new()),
            picture: None,
        };
        let profile = profile_from_response(info);
        assert_eq!(profile.display_name, "");
        assert!(profile.email.is_none());
        assert_eq!(profile.avatar_url, "");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let client = GoogleUserInfoClient::with_base_url("http://127.0.0.1:1/info".to_string());
        let err = client.fetch_profile("token").await.unwrap_err();
        assert!(matches!(err, AuthError::Provider(_)));
    }
}
