/// Config
///
/// Project credentials and dApp metadata, read from a
/// `walletconnectconfig.json` file:
///
/// ```json
/// {
///   "project_id": "35d44d49c2dee217a3eb24bb4410acc7",
///   "metadata": {
///     "name": "My Chia dApp",
///     "description": "Trades offers with your Chia wallet",
///     "url": "https://example.org",
///     "icons": []
///   }
/// }
/// ```
///
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_CHAIN_ID, DEFAULT_LOGGER, DEFAULT_RELAY_URL};
use crate::error::{Error, Result};
use crate::types::Metadata;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletConnectConfig {
    pub project_id: String,
    pub metadata: Metadata,
}

impl WalletConnectConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        raw.parse()
    }
}

impl FromStr for WalletConnectConfig {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let config = serde_json::from_str::<Self>(s)?;
        if config.project_id.trim().is_empty() {
            return Err("project_id must not be empty".into());
        }
        Ok(config)
    }
}

/// Everything the client context needs to create a sign client
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub walletconnect: WalletConnectConfig,
    /// Chains requested when proposing a session
    pub chains: Vec<String>,
    pub logger: String,
    pub default_relay_url: String,
}

impl ClientConfig {
    pub fn new(walletconnect: WalletConnectConfig) -> Self {
        Self {
            walletconnect,
            chains: vec![DEFAULT_CHAIN_ID.to_string()],
            logger: DEFAULT_LOGGER.to_string(),
            default_relay_url: DEFAULT_RELAY_URL.to_string(),
        }
    }

    pub fn with_chains<S: Into<String>>(
        mut self,
        chains: impl IntoIterator<Item = S>,
    ) -> Self {
        self.chains = chains.into_iter().map(Into::into).collect();
        self
    }
}

/// Options handed to `SignClient::init`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    pub logger: String,
    #[serde(rename = "relayUrl")]
    pub relay_url: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub metadata: Metadata,
}

/// Relay urls must be websocket endpoints
pub fn validate_relay_url(relay_url: &str) -> Result<Url> {
    let url = Url::parse(relay_url)?;
    match url.scheme() {
        "ws" | "wss" if url.host().is_some() => Ok(url),
        _ => Err(Error::InvalidRelayUrl(relay_url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REGIONALIZED_RELAYER_ENDPOINTS;

    const CONFIG: &str = r#"{
        "project_id": "35d44d49c2dee217a3eb24bb4410acc7",
        "metadata": {
            "name": "Chia dApp",
            "description": "Chia WalletConnect dApp",
            "url": "https://example.org",
            "icons": ["https://example.org/icon.png"]
        }
    }"#;

    #[test]
    fn test_parse_config() {
        let config = WalletConnectConfig::from_str(CONFIG).unwrap();
        assert_eq!(config.project_id, "35d44d49c2dee217a3eb24bb4410acc7");
        assert_eq!(config.metadata.name, "Chia dApp");

        let client = ClientConfig::new(config);
        assert_eq!(client.chains, vec!["chia:testnet"]);
        assert_eq!(client.logger, "debug");
        assert_eq!(client.default_relay_url, "wss://relay.walletconnect.com");

        let client = client.with_chains(["chia:mainnet"]);
        assert_eq!(client.chains, vec!["chia:mainnet"]);
    }

    #[test]
    fn test_empty_project_id_is_rejected() {
        let raw = CONFIG.replace("35d44d49c2dee217a3eb24bb4410acc7", " ");
        assert!(WalletConnectConfig::from_str(&raw).is_err());
    }

    #[test]
    fn test_from_missing_path() {
        let err = WalletConnectConfig::from_path("/nonexistent/wc.json");
        assert!(matches!(err, Err(Error::IoError(_))));
    }

    #[test]
    fn test_validate_relay_url() {
        for region in REGIONALIZED_RELAYER_ENDPOINTS {
            assert!(validate_relay_url(region.value.unwrap()).is_ok());
        }
        assert!(matches!(
            validate_relay_url("https://relay.walletconnect.com"),
            Err(Error::InvalidRelayUrl(_))
        ));
        assert!(matches!(
            validate_relay_url("not a url"),
            Err(Error::UrlParseError(_))
        ));
    }
}
