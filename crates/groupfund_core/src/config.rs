//! Explicit configuration for reaching algod and driving the deposit flow.

use crate::address_resolver::ReconciliationPolicy;
use crate::error::DepositError;
use std::collections::HashMap;
use std::num::NonZeroU32;

#[cfg(feature = "default_http_client")]
use groupfund_algod::AlgodClient;
#[cfg(feature = "default_http_client")]
use groupfund_http_client::DefaultHttpClient;
#[cfg(feature = "default_http_client")]
use std::sync::Arc;

pub const DEFAULT_MAX_ROUNDS_TO_WAIT: u32 = 4;
pub const DEFAULT_VALIDITY_WINDOW: u64 = 1000;
pub const MICRO_UNITS_PER_UNIT: u64 = 1_000_000;
pub const ALGOD_TOKEN_HEADER: &str = "X-Algo-API-Token";

#[derive(Debug, Clone, PartialEq)]
pub enum TokenHeader {
    String(String),
    Headers(HashMap<String, String>),
}

/// Config for an Algorand client.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoClientConfig {
    /// Base URL of the server e.g. http://localhost, https://testnet-api.algonode.cloud
    pub server: String,
    /// Optional port to use e.g. 4001, 443
    pub port: Option<u16>,
    /// Optional token to use for API authentication
    pub token: Option<TokenHeader>,
}

impl AlgoClientConfig {
    pub fn testnet() -> Self {
        Self::algonode("testnet")
    }

    pub fn mainnet() -> Self {
        Self::algonode("mainnet")
    }

    pub fn localnet() -> Self {
        AlgoClientConfig {
            server: "http://localhost".to_string(),
            port: Some(4001),
            token: Some(TokenHeader::String("a".repeat(64))),
        }
    }

    fn algonode(network: &str) -> Self {
        AlgoClientConfig {
            server: format!("https://{}-api.algonode.cloud", network),
            port: Some(443),
            token: None,
        }
    }

    pub fn base_url(&self) -> String {
        let server = self.server.trim_end_matches('/');
        match self.port {
            Some(port) => format!("{}:{}", server, port),
            None => server.to_string(),
        }
    }

    #[cfg(feature = "default_http_client")]
    pub fn algod_client(&self) -> Result<AlgodClient, DepositError> {
        let base_url = self.base_url();
        let headers: Vec<(&str, &str)> = match &self.token {
            Some(TokenHeader::String(token)) => vec![(ALGOD_TOKEN_HEADER, token.as_str())],
            Some(TokenHeader::Headers(headers)) => headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            None => Vec::new(),
        };

        let http_client = DefaultHttpClient::with_default_headers(&base_url, headers)
            .map_err(|e| DepositError::InvalidConfig {
                message: e.to_string(),
            })?;

        Ok(AlgodClient::new(Arc::new(http_client)))
    }
}

/// Everything the deposit flow needs besides the credential and application id.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositConfig {
    pub algod: AlgoClientConfig,
    /// Bounds the confirmation polling loop. Tune for network conditions.
    pub max_rounds_to_wait: NonZeroU32,
    /// Rounds added to the snapshot's last round to get `last_valid`.
    pub validity_window: u64,
    pub reconciliation: ReconciliationPolicy,
    pub micro_units_per_unit: u64,
}

impl Default for DepositConfig {
    fn default() -> Self {
        DepositConfig {
            algod: AlgoClientConfig::testnet(),
            max_rounds_to_wait: NonZeroU32::new(DEFAULT_MAX_ROUNDS_TO_WAIT).unwrap_or(NonZeroU32::MIN),
            validity_window: DEFAULT_VALIDITY_WINDOW,
            reconciliation: ReconciliationPolicy::default(),
            micro_units_per_unit: MICRO_UNITS_PER_UNIT,
        }
    }
}

impl DepositConfig {
    /// Loads `.env` if present and reads `ALGOD_*` and `GROUPFUND_*` variables.
    pub fn from_environment() -> Result<Self, DepositError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a variable lookup; unset variables keep the TestNet defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DepositError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DepositConfig::default();

        if let Some(server) = lookup("ALGOD_SERVER") {
            config.algod = AlgoClientConfig {
                server,
                port: None,
                token: None,
            };
        }
        if let Some(port) = lookup("ALGOD_PORT") {
            config.algod.port = Some(parse_var("ALGOD_PORT", &port)?);
        }
        if let Some(token) = lookup("ALGOD_TOKEN") {
            config.algod.token = Some(TokenHeader::String(token));
        }
        if let Some(rounds) = lookup("GROUPFUND_MAX_ROUNDS") {
            config.max_rounds_to_wait = parse_var("GROUPFUND_MAX_ROUNDS", &rounds)?;
        }
        if let Some(window) = lookup("GROUPFUND_VALIDITY_WINDOW") {
            config.validity_window = parse_var("GROUPFUND_VALIDITY_WINDOW", &window)?;
        }
        if let Some(policy) = lookup("GROUPFUND_ADDRESS_POLICY") {
            config.reconciliation = parse_var("GROUPFUND_ADDRESS_POLICY", &policy)?;
        }

        Ok(config)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, DepositError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| DepositError::InvalidConfig {
            message: format!("{} = '{}': {}", name, value, e),
        })
}
