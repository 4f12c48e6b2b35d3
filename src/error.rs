use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Longest response body excerpt carried in a failure message.
const BODY_EXCERPT_CHARS: usize = 2048;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("credential `{property}` not found (looked in {} and ${env})", path.display())]
    MissingCredential { path: PathBuf, property: &'static str, env: &'static str },

    #[error("failed to read {}", path.display())]
    ConfigRead { path: PathBuf, #[source] source: std::io::Error },

    #[error("invalid harness config")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid base url `{url}`")]
    InvalidBaseUrl { url: String, #[source] source: url::ParseError },

    #[error("base url `{0}` cannot carry a path")]
    OpaqueBaseUrl(String),

    #[error("request to {url} failed")]
    Transport { url: String, #[source] source: reqwest::Error },

    #[error("could not decode response from {url}: {source}\n--- body ---\n{body}")]
    Decode { url: String, body: String, #[source] source: serde_json::Error },

    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

/// A response that does not honour the documented contract.
///
/// Carries the (redacted) request URL and the response body so a failing
/// check shows what was asked and what came back.
#[derive(Debug, Clone, Error)]
pub struct ContractViolation {
    pub url: String,
    pub check: String,
    pub expected: String,
    pub actual: String,
    pub body: String,
}

impl ContractViolation {
    pub fn new(
        url: impl Into<String>,
        check: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
        body: &str,
    ) -> Self {
        let v = Self {
            url: url.into(),
            check: check.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            body: excerpt(body),
        };
        tracing::warn!(url = %v.url, check = %v.check, expected = %v.expected, actual = %v.actual, "contract violation");
        v
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: expected {}, got {}", self.check, self.expected, self.actual)?;
        writeln!(f, "request: GET {}", self.url)?;
        write!(f, "--- body ---\n{}", self.body)
    }
}

pub(crate) fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}… ({} bytes total)", &body[..cut], body.len()),
        None => body.to_string(),
    }
}
