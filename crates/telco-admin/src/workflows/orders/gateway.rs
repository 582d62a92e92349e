use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::NbnConfig;

/// JSON payload POSTed to the provider's B2B order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub plan_name: String,
}

/// Provider response for one order attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub status: String,
    #[serde(default)]
    pub id: Option<String>,
}

impl OrderResponse {
    pub const SUCCESSFUL: &'static str = "Successful";

    pub fn is_successful(&self) -> bool {
        self.status == Self::SUCCESSFUL
    }
}

/// Seam for placing orders so the worker can run against the live B2B
/// endpoint or replay a canned fixture.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn place(&self, request: &OrderRequest) -> Result<OrderResponse, GatewayError>;
}

/// Gateway sending the real POST to the configured provider endpoint.
pub struct B2bOrderGateway {
    endpoint: String,
    client: reqwest::Client,
}

impl B2bOrderGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl OrderGateway for B2bOrderGateway {
    async fn place(&self, request: &OrderRequest) -> Result<OrderResponse, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

/// Gateway replaying a canned JSON response from the stubs directory.
/// The request payload is still built and validated, then ignored.
pub struct FixtureOrderGateway {
    path: PathBuf,
}

impl FixtureOrderGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &NbnConfig) -> Self {
        Self::new(config.fixture_path())
    }
}

#[async_trait]
impl OrderGateway for FixtureOrderGateway {
    async fn place(&self, _request: &OrderRequest) -> Result<OrderResponse, GatewayError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| GatewayError::Fixture {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Error enumeration for gateway failures. These surface as job failures;
/// a provider-reported rejection is an ordinary `OrderResponse` instead.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("order request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unable to read fixture response {path}: {source}")]
    Fixture {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed order response: {0}")]
    Malformed(#[from] serde_json::Error),
}
