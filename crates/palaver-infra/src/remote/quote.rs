//! Random quote client for the auto-responder.
//!
//! Fetches a quote from the ZenQuotes API. Like the avatar client, failures
//! degrade to fixed bot phrases instead of erroring, so the auto-reply always
//! has something to say.

use palaver_core::remote::QuoteFetcher;
use serde::Deserialize;
use tracing::warn;

/// ZenQuotes random quote endpoint.
const ZEN_QUOTES_BASE: &str = "https://zenquotes.io/api/random";

/// Used when the API answered but the payload held no quote.
const FALLBACK_BAD_PAYLOAD: &str =
    "The chat bot says: I received data, but it was not a valid quote.";

/// Used when the request itself failed.
const FALLBACK_REQUEST_FAILED: &str =
    "The chat bot says: I am currently unable to provide a quote, but hello!";

#[derive(Debug, Deserialize)]
struct ZenQuote {
    q: String,
}

/// Quote fetcher backed by the ZenQuotes API.
pub struct ZenQuotesClient {
    base_url: String,
    http: reqwest::Client,
}

impl ZenQuotesClient {
    pub fn new() -> Self {
        Self::with_base_url(ZEN_QUOTES_BASE.to_string())
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

impl Default for ZenQuotesClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The API returns an array; the first non-empty `q` wins.
fn quote_from_response(quotes: Vec<ZenQuote>) -> String {
    quotes
        .into_iter()
        .map(|quote| quote.q)
        .find(|q| !q.is_empty())
        .unwrap_or_else(|| FALLBACK_BAD_PAYLOAD.to_string())
}

impl QuoteFetcher for ZenQuotesClient {
    async fn fetch_quote(&self) -> String {
        let response = match self.http.get(&self.base_url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "zenquotes request failed");
                return FALLBACK_REQUEST_FAILED.to_string();
            }
        };

        match response.json::<Vec<ZenQuote>>().await {
            Ok(quotes) => quote_from_response(quotes),
            Err(e) => {
                warn!(error = %e, "zenquotes returned unparseable payload");
                FALLBACK_BAD_PAYLOAD.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_quote_wins() {
        let quotes = vec![
            ZenQuote {
                q: "Stay curious.".to_string(),
            },
            ZenQuote {
                q: "Second quote.".to_string(),
            },
        ];
        assert_eq!(quote_from_response(quotes), "Stay curious.");
    }

    #[test]
    fn test_empty_array_falls_back() {
        assert_eq!(quote_from_response(vec![]), FALLBACK_BAD_PAYLOAD);
    }

    #[test]
    fn test_empty_quote_text_skipped() {
        let quotes = vec![
            ZenQuote { q: String::new() },
            ZenQuote {
                q: "Onward.".to_string(),
            },
        ];
        assert_eq!(quote_from_response(quotes), "Onward.");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let client = ZenQuotesClient::with_base_url("http://127.0.0.1:1/random".to_string());
        let quote = client.fetch_quote().await;
        assert_eq!(quote, FALLBACK_REQUEST_FAILED);
    }
}
