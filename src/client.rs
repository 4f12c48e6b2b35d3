use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{excerpt, HarnessError};
use crate::request::RequestSpec;

/// Thin GET-only client over reqwest. Holds no per-request state, so one
/// instance is shared by every case in a run.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self, HarnessError> {
        if base_url.cannot_be_a_base() {
            return Err(HarnessError::OpaqueBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("giphy-contract/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| HarnessError::Transport { url: base_url.to_string(), source: source.without_url() })?;
        Ok(Self { http, base_url })
    }

    /// Full URL for `spec`: base path + endpoint segments + query in insertion order.
    pub fn url_for(&self, spec: &RequestSpec) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segs) = url.path_segments_mut() {
            segs.pop_if_empty().extend(spec.endpoint.segments());
        }
        if !spec.params.is_empty() {
            url.query_pairs_mut().extend_pairs(spec.params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    /// Sends the request. Any HTTP status is a successful send; only
    /// transport failures are errors here.
    pub async fn get(&self, spec: &RequestSpec) -> Result<ApiResponse, HarnessError> {
        let url = self.url_for(spec);
        let shown = redact(&url);
        tracing::debug!(url = %shown, "GET");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| HarnessError::Transport { url: shown.clone(), source: source.without_url() })?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|source| HarnessError::Transport { url: shown.clone(), source: source.without_url() })?;
        tracing::debug!(url = %shown, status, bytes = body.len(), "response");
        Ok(ApiResponse { url: shown, status, body })
    }
}

/// A received response: status plus raw body, decoded lazily.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Request URL with the api key masked.
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HarnessError> {
        serde_json::from_str(&self.body).map_err(|source| HarnessError::Decode {
            url: self.url.clone(),
            body: excerpt(&self.body),
            source,
        })
    }
}

/// Masks the `api_key` query value so urls are safe to log.
pub fn redact(url: &Url) -> String {
    if url.query_pairs().all(|(k, _)| k != "api_key") {
        return url.to_string();
    }
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Endpoint;

    fn client(base: &str) -> ApiClient { ApiClient::new(Url::parse(base).unwrap()).unwrap() }

    #[test]
    fn url_keeps_base_path() {
        let c = client("https://api.giphy.com/v1");
        let url = c.url_for(&RequestSpec::new(Endpoint::GifTrending).limit(10).offset(40));
        assert_eq!(url.as_str(), "https://api.giphy.com/v1/gifs/trending?limit=10&offset=40");
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let c = client("http://127.0.0.1:8080/v1/");
        let url = c.url_for(&RequestSpec::new(Endpoint::GifById("abc".into())));
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/v1/gifs/abc");
    }

    #[test]
    fn no_params_means_no_query() {
        let c = client("https://api.giphy.com/v1");
        assert!(c.url_for(&RequestSpec::new(Endpoint::StickerSearch)).query().is_none());
    }

    #[test]
    fn redact_masks_only_api_key() {
        let url = Url::parse("https://h/v1/stickers/search?api_key=secret&q=cats").unwrap();
        let shown = redact(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("q=cats"));
        assert!(shown.contains("api_key=***") || shown.contains("api_key=%2A%2A%2A"));
    }

    #[test]
    fn decode_failure_carries_body() {
        let resp = ApiResponse { url: "u".into(), status: 200, body: "<html>".into() };
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, HarnessError::Decode { ref body, .. } if body == "<html>"));
    }
}
