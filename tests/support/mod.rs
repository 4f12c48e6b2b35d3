//! In-process stand-in for the GIPHY API, served through wiremock.
//!
//! Answers the three endpoints under contract the way the live service does,
//! including its quirks (limit ceiling, zeroed pagination for negative values,
//! and the sticker/trending split on offsets past the end). `Quirks` switches
//! individual behaviours off to prove the harness notices.

#![allow(dead_code)]

use giphy_contract::config::{AuthContract, Credentials, HarnessConfig};
use giphy_contract::types::Rating;
use giphy_contract::Harness;
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const GOOD_KEY: &str = "test-key-0123456789";
pub const KNOWN_GIF: &str = "zdIGTIdD1mi4";

const CEILING: i64 = 50;
const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct Quirks {
    /// Invalid key answered with 401 `Unauthorized`.
    pub legacy_auth: bool,
    /// `rating` parameter has no effect.
    pub ignore_rating: bool,
    /// Sticker search zeroes pagination on overflow like trending does.
    pub zero_sticker_overflow: bool,
    /// `meta.response_id` is null.
    pub null_response_id: bool,
    /// Trending ignores `offset`.
    pub trending_ignores_offset: bool,
    /// `limit` is honoured past the ceiling.
    pub no_ceiling: bool,
    /// Negative `limit`/`offset` still report the real `total_count`.
    pub echo_negative: bool,
}

struct FakeGiphy {
    trending: Vec<(String, Rating)>,
    stickers: Vec<(String, Rating)>,
    quirks: Quirks,
}

fn catalog(prefix: &str, n: usize) -> Vec<(String, Rating)> {
    (0..n).map(|i| (format!("{prefix}{i:03}"), Rating::ALL[i % Rating::ALL.len()])).collect()
}

impl FakeGiphy {
    fn meta(&self, status: u16, msg: &str) -> Value {
        let rid = if self.quirks.null_response_id { Value::Null } else { json!("mock-response-id") };
        json!({"status": status, "msg": msg, "response_id": rid})
    }

    fn page(&self, data: Vec<Value>, total: u64, count: u64, offset: u64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "data": data,
            "pagination": {"total_count": total, "count": count, "offset": offset},
            "meta": self.meta(200, "OK"),
        }))
    }

    fn list(&self, items: &[(String, Rating)], kind: &str, q: &Params, sticker: bool) -> ResponseTemplate {
        let filtered: Vec<&(String, Rating)> = match q.rating {
            Some(r) if !self.quirks.ignore_rating => items.iter().filter(|(_, ir)| *ir <= r).collect(),
            _ => items.iter().collect(),
        };
        let limit = q.limit.unwrap_or(DEFAULT_LIMIT);
        let mut offset = q.offset.unwrap_or(0);
        if limit < 0 || offset < 0 {
            return if self.quirks.echo_negative {
                self.page(Vec::new(), filtered.len() as u64, 0, 0)
            } else {
                self.page(Vec::new(), 0, 0, 0)
            };
        }
        if !sticker && self.quirks.trending_ignores_offset {
            offset = 0;
        }
        let total = filtered.len() as i64;
        if offset >= total {
            return if sticker && !self.quirks.zero_sticker_overflow {
                self.page(Vec::new(), total as u64, 0, offset as u64)
            } else {
                self.page(Vec::new(), 0, 0, 0)
            };
        }
        let page = if self.quirks.no_ceiling { limit } else { limit.min(CEILING) };
        let end = (offset + page).min(total);
        let data: Vec<Value> = filtered[offset as usize..end as usize]
            .iter()
            .map(|(id, r)| json!({"type": kind, "id": id, "rating": r.as_str(), "title": format!("{kind} {id}")}))
            .collect();
        let count = data.len() as u64;
        self.page(data, total as u64, count, offset as u64)
    }
}

struct Params {
    api_key: Option<String>,
    q: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    rating: Option<Rating>,
}

fn params(req: &Request) -> Params {
    let get = |name: &str| req.url.query_pairs().find(|(k, _)| k == name).map(|(_, v)| v.into_owned());
    Params {
        api_key: get("api_key"),
        q: get("q").filter(|q| !q.is_empty()),
        limit: get("limit").and_then(|v| v.parse().ok()),
        offset: get("offset").and_then(|v| v.parse().ok()),
        rating: get("rating").and_then(|v| v.parse().ok()),
    }
}

impl Respond for FakeGiphy {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let q = params(req);
        match q.api_key.as_deref() {
            None => return ResponseTemplate::new(401).set_body_json(json!({"message": "No API key found in request"})),
            Some(GOOD_KEY) => {}
            Some(_) if self.quirks.legacy_auth => {
                return ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"}))
            }
            Some(_) => {
                return ResponseTemplate::new(403).set_body_json(json!({"message": "Invalid authentication credentials"}))
            }
        }
        let segments: Vec<&str> = req.url.path().trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["v1", "gifs", "trending"] => self.list(&self.trending, "gif", &q, false),
            ["v1", "stickers", "search"] if q.q.is_none() => self.page(Vec::new(), 0, 0, 0),
            ["v1", "stickers", "search"] => self.list(&self.stickers, "sticker", &q, true),
            ["v1", "gifs", id] if *id == KNOWN_GIF => ResponseTemplate::new(200).set_body_json(json!({
                "data": {"type": "gif", "id": KNOWN_GIF, "rating": "g", "title": "known"},
                "meta": self.meta(200, "OK"),
            })),
            _ => ResponseTemplate::new(404).set_body_json(json!({"data": [], "meta": self.meta(404, "Not Found")})),
        }
    }
}

pub async fn fake_giphy(quirks: Quirks) -> MockServer {
    let server = MockServer::start().await;
    let fake = FakeGiphy { trending: catalog("t", 120), stickers: catalog("s", 80), quirks };
    Mock::given(method("GET")).respond_with(fake).mount(&server).await;
    server
}

pub fn harness_for(server: &MockServer, auth_contract: AuthContract) -> Harness {
    let config = HarnessConfig { auth_contract, ..HarnessConfig::default() }
        .with_base_url(&format!("{}/v1", server.uri()))
        .expect("mock base url");
    Harness::new(config, Credentials::new(GOOD_KEY)).expect("harness")
}

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("giphy_contract=debug")
        .try_init();
}
