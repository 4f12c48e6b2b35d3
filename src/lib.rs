pub mod assertions;
pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod request;
pub mod suite;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for contract suites.
pub mod prelude {
    pub use crate::assertions::Checked;
    pub use crate::client::{ApiClient, ApiResponse};
    pub use crate::config::{AuthContract, AuthExpectation, Credentials, HarnessConfig};
    pub use crate::error::{ContractViolation, HarnessError};
    pub use crate::pagination::OverflowPolicy;
    pub use crate::request::{Endpoint, RequestSpec};
    pub use crate::suite::{Case, Group, Outcome, Report, RunOptions, Stability};
    pub use crate::types::{Envelope, Item, Meta, Pagination, Rating};
    pub use crate::Harness;
}

use std::path::Path;

use crate::client::{ApiClient, ApiResponse};
use crate::config::{parse_base_url, Credentials, HarnessConfig};
use crate::error::HarnessError;
use crate::request::{Endpoint, RequestSpec};

/// Shared fixture for every case: settings, the valid key, and one HTTP client.
/// Immutable once built, so cases can borrow it concurrently.
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
    credentials: Credentials,
    client: ApiClient,
}

impl Harness {
    pub fn new(config: HarnessConfig, credentials: Credentials) -> Result<Self, HarnessError> {
        let client = ApiClient::new(parse_base_url(&config.base_url)?)?;
        Ok(Self { config, credentials, client })
    }

    /// Loads settings (optional TOML) and the credential (properties file or
    /// `$GIPHY_API_KEY`). A missing credential is fatal.
    pub fn load(config_path: Option<&Path>, properties_path: &Path) -> Result<Self, HarnessError> {
        let config = HarnessConfig::load(config_path)?;
        let credentials = Credentials::load(properties_path)?;
        tracing::info!(base_url = %config.base_url, auth_contract = ?config.auth_contract, "harness ready");
        Self::new(config, credentials)
    }

    pub fn config(&self) -> &HarnessConfig { &self.config }
    pub fn client(&self) -> &ApiClient { &self.client }

    /// Request with no `api_key` at all.
    pub fn anonymous(&self, endpoint: Endpoint) -> RequestSpec { RequestSpec::new(endpoint) }

    /// Request carrying the valid key.
    pub fn authed(&self, endpoint: Endpoint) -> RequestSpec {
        RequestSpec::new(endpoint).api_key(self.credentials.api_key())
    }

    /// Request carrying the placeholder key.
    pub fn with_invalid_key(&self, endpoint: Endpoint) -> RequestSpec {
        RequestSpec::new(endpoint).api_key(Credentials::invalid_key())
    }

    pub async fn send(&self, spec: &RequestSpec) -> Result<ApiResponse, HarnessError> {
        self.client.get(spec).await
    }
}
