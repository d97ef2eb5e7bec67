/// Chains
///
/// Static data about the Chia networks a session can target and helpers to
/// describe a pending request to the user.
///
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::constants::{CHIA_LOGO, CHIA_NAMESPACE, CHIA_RGB, CHIA_SLIP44};
use crate::error::{Error, Result};
use crate::types::RpcRequest;
use crate::utils::split_chain_id;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChainData {
    pub name: &'static str,
    pub id: &'static str,
    pub rpc: &'static [&'static str],
    pub slip44: u32,
    pub testnet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChainMetadata {
    pub logo: &'static str,
    pub rgb: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainRequestRender {
    pub label: String,
    pub value: String,
}

pub const CHIA_TESTNET: ChainData = ChainData {
    name: "Chia Testnet",
    id: "chia:testnet",
    rpc: &["https://chia.net"],
    slip44: CHIA_SLIP44,
    testnet: true,
};

pub const CHIA_MAINNET: ChainData = ChainData {
    name: "Chia Mainnet",
    id: "chia:mainnet",
    rpc: &["https://chia.net"],
    slip44: CHIA_SLIP44,
    testnet: false,
};

pub static CHIA_CHAINS: [ChainData; 2] = [CHIA_TESTNET, CHIA_MAINNET];

const CHIA_METADATA: ChainMetadata = ChainMetadata {
    logo: CHIA_LOGO,
    rgb: CHIA_RGB,
};

pub fn chain_data(chain_id: &str) -> Option<&'static ChainData> {
    CHIA_CHAINS.iter().find(|c| c.id == chain_id)
}

pub fn chain_metadata(chain_id: &str) -> Result<ChainMetadata> {
    match split_chain_id(chain_id) {
        (CHIA_NAMESPACE, reference) => chia_chain_metadata(chain_id, reference),
        (namespace, _) => Err(Error::NoMetadataHandler(namespace.to_string())),
    }
}

fn chia_chain_metadata(
    chain_id: &str,
    reference: Option<&str>,
) -> Result<ChainMetadata> {
    match reference {
        Some("testnet") | Some("mainnet") => Ok(CHIA_METADATA),
        _ => Err(Error::NoChainMetadata(chain_id.to_string())),
    }
}

/// Label/value rows describing a request before it is sent to the wallet
pub fn chain_request_render(
    request: &RpcRequest,
    chain_id: &str,
) -> Result<Vec<ChainRequestRender>> {
    match split_chain_id(chain_id) {
        (CHIA_NAMESPACE, _) => Ok(vec![
            ChainRequestRender {
                label: "Method".to_string(),
                value: request.method.clone(),
            },
            ChainRequestRender {
                label: "params".to_string(),
                value: to_tab_indented_json(&request.params)?,
            },
        ]),
        (namespace, _) => Err(Error::NoRenderHandler(namespace.to_string())),
    }
}

fn to_tab_indented_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(
        &mut buf,
        PrettyFormatter::with_indent(b"\t"),
    );
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| e.to_string().into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_chain_metadata() {
        assert_eq!(chain_metadata("chia:mainnet").unwrap().rgb, "92, 170, 98");
        assert_eq!(
            chain_metadata("chia:devnet").unwrap_err().to_string(),
            "No chain metadata found for chainId: chia:devnet"
        );
        assert_eq!(
            chain_metadata("eip155:1").unwrap_err().to_string(),
            "No metadata handler for namespace eip155"
        );
    }

    #[test]
    fn test_chain_data() {
        let testnet = chain_data("chia:testnet").unwrap();
        assert!(testnet.testnet);
        assert_eq!(testnet.slip44, 8444);
        assert!(chain_data("chia:devnet").is_none());
    }

    #[test]
    fn test_chain_request_render() {
        let request = RpcRequest {
            method: "chia_getWalletBalance".to_string(),
            params: json!({ "fingerprint": 42 }),
        };

        let rows = chain_request_render(&request, "chia:testnet").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Method");
        assert_eq!(rows[0].value, "chia_getWalletBalance");
        assert_eq!(rows[1].label, "params");
        assert_eq!(rows[1].value, "{\n\t\"fingerprint\": 42\n}");

        assert_eq!(
            chain_request_render(&request, "eip155:1")
                .unwrap_err()
                .to_string(),
            "No render handler for namespace eip155"
        );
    }
}
