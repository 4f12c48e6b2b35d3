use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::HarnessError;
use crate::pagination::VENDOR_LIMIT_CEILING;
use crate::types::Rating;

pub const DEFAULT_BASE_URL: &str = "https://api.giphy.com/v1";
pub const DEFAULT_PROPERTIES_PATH: &str = "test.properties";
pub const DEFAULT_CONFIG_PATH: &str = "giphy-contract.toml";

pub const API_KEY_PROPERTY: &str = "api_key";
pub const API_KEY_ENV: &str = "GIPHY_API_KEY";
pub const BASE_URL_ENV: &str = "GIPHY_BASE_URL";

/// Well-formed but unknown key, used to provoke auth failures.
pub const BAD_API_KEY: &str = "XXXXXXXXXXXXXXXXXXXXXXXXXXXX";

/// The caller's API key. Read once, never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self { Self { api_key: api_key.into() } }

    /// `$GIPHY_API_KEY` if set, else the `api_key` property of `path`.
    pub fn load(path: &Path) -> Result<Self, HarnessError> { Self::load_with(path, process_env) }

    /// [`Credentials::load`] with the environment lookup supplied by the caller.
    pub fn load_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        if let Some(key) = non_blank(env(API_KEY_ENV)) {
            tracing::debug!("api key taken from ${}", API_KEY_ENV);
            return Ok(Self::new(key));
        }
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => missing(path),
            _ => HarnessError::ConfigRead { path: path.to_path_buf(), source },
        })?;
        Self::from_properties(&text).ok_or_else(|| missing(path))
    }

    /// Picks `api_key` out of `.properties` text. Empty values count as absent.
    pub fn from_properties(text: &str) -> Option<Self> {
        parse_properties(text)
            .into_iter()
            .rev()
            .find(|(k, _)| k == API_KEY_PROPERTY)
            .map(|(_, v)| v)
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }

    pub fn api_key(&self) -> &str { &self.api_key }
    pub fn invalid_key() -> &'static str { BAD_API_KEY }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("api_key", &"***").finish()
    }
}

fn process_env(name: &str) -> Option<String> { std::env::var(name).ok() }

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn missing(path: &Path) -> HarnessError {
    HarnessError::MissingCredential { path: path.to_path_buf(), property: API_KEY_PROPERTY, env: API_KEY_ENV }
}

/// Minimal `.properties` reader: `key=value`, `key: value` or `key value`,
/// `#`/`!` comments. Later duplicates win.
fn parse_properties(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('!'))
        .map(|l| {
            let cut = l.find(|c: char| c == '=' || c == ':' || c.is_whitespace()).unwrap_or(l.len());
            let rest = l[cut..].trim_start();
            let value = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim();
            (l[..cut].to_string(), value.to_string())
        })
        .collect()
}

/// Which invalid-key answer the target API version gives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthContract {
    /// 403 `Invalid authentication credentials`
    #[default]
    Current,
    /// 401 `Unauthorized`, seen on older captures
    Legacy,
}

/// Expected status and message for a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthExpectation {
    pub status: u16,
    pub message: &'static str,
}

impl AuthContract {
    pub fn missing_key(self) -> AuthExpectation {
        AuthExpectation { status: 401, message: "No API key found in request" }
    }

    pub fn invalid_key(self) -> AuthExpectation {
        match self {
            AuthContract::Current => AuthExpectation { status: 403, message: "Invalid authentication credentials" },
            AuthContract::Legacy => AuthExpectation { status: 401, message: "Unauthorized" },
        }
    }
}

impl std::str::FromStr for AuthContract {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "legacy" => Ok(Self::Legacy),
            other => Err(anyhow::anyhow!("unknown auth contract `{}` (expected current, legacy)", other)),
        }
    }
}

/// Harness settings. Every key is optional in `giphy-contract.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Checked by [`parse_base_url`] whenever it is set.
    pub base_url: String,
    pub auth_contract: AuthContract,
    pub limit_ceiling: u32,
    /// Page size the docs promise when `limit` is omitted.
    pub default_limit: u32,
    pub known_gif_id: String,
    pub known_gif_rating: Rating,
    pub search_term: String,
    pub rating_search_term: String,
    pub overflow_search_term: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_contract: AuthContract::Current,
            limit_ceiling: VENDOR_LIMIT_CEILING,
            default_limit: 25,
            known_gif_id: "zdIGTIdD1mi4".to_string(),
            known_gif_rating: Rating::G,
            search_term: "cheeseburgers".to_string(),
            rating_search_term: "death".to_string(),
            overflow_search_term: "unique".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Reads `path` if given (missing file is an error), else the default
    /// config file if present, else defaults. `$GIPHY_BASE_URL` wins over both.
    pub fn load(path: Option<&Path>) -> Result<Self, HarnessError> { Self::load_with(path, process_env) }

    /// [`HarnessConfig::load`] with the environment lookup supplied by the caller.
    pub fn load_with(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        let mut cfg = match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text)?,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(HarnessError::ConfigRead { path, source }),
        };
        match non_blank(env(BASE_URL_ENV)) {
            Some(raw) => cfg.with_base_url(&raw),
            None => Ok(cfg),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, HarnessError> {
        let cfg: Self = toml::from_str(text)?;
        parse_base_url(&cfg.base_url)?;
        Ok(cfg)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, HarnessError> {
        self.base_url = parse_base_url(raw)?.to_string();
        Ok(self)
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, HarnessError> {
    let url = Url::parse(raw).map_err(|source| HarnessError::InvalidBaseUrl { url: raw.to_string(), source })?;
    if url.cannot_be_a_base() {
        return Err(HarnessError::OpaqueBaseUrl(raw.to_string()));
    }
    Ok(url)
}
