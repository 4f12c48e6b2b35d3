use std::fmt;

use crate::types::Rating;

/// The endpoints under contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/gifs/{id}`
    GifById(String),
    /// `/gifs/trending`
    GifTrending,
    /// `/stickers/search`
    StickerSearch,
}

impl Endpoint {
    /// Path segments relative to the API base.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::GifById(id) => vec!["gifs", id.as_str()],
            Endpoint::GifTrending => vec!["gifs", "trending"],
            Endpoint::StickerSearch => vec!["stickers", "search"],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments().join("/"))
    }
}

/// One GET: endpoint plus query parameters in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
}

impl RequestSpec {
    pub fn new(endpoint: Endpoint) -> Self { Self { endpoint, params: Vec::new() } }

    pub fn api_key(self, key: &str) -> Self { self.param("api_key", key) }
    pub fn query(self, q: &str) -> Self { self.param("q", q) }
    pub fn rating(self, rating: Rating) -> Self { self.param("rating", rating.as_str()) }
    // Signed so out-of-range values can be sent as-is.
    pub fn limit(self, limit: i64) -> Self { self.param("limit", limit.to_string()) }
    pub fn offset(self, offset: i64) -> Self { self.param("offset", offset.to_string()) }

    /// Appends a parameter, replacing an earlier one with the same name in place.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }
}
