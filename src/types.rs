/// Types
///
/// Method names, namespaces and the session/pairing descriptors exchanged
/// with the sign client, plus the request and response envelopes used by the
/// RPC context.
///
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{
    CHIA_NAMESPACE, USER_DISCONNECTED_CODE, USER_DISCONNECTED_MESSAGE,
};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChiaMethod {
    #[serde(rename = "chia_logIn")]
    LogIn,
    #[serde(rename = "chia_getWallets")]
    GetWallets,
    #[serde(rename = "chia_getTransaction")]
    GetTransaction,
    #[serde(rename = "chia_getWalletBalance")]
    GetWalletBalance,
    #[serde(rename = "chia_getCurrentAddress")]
    GetCurrentAddress,
    #[serde(rename = "chia_sendTransaction")]
    SendTransaction,
    #[serde(rename = "chia_signMessageById")]
    SignMessageById,
    #[serde(rename = "chia_signMessageByAddress")]
    SignMessageByAddress,
    #[serde(rename = "chia_verifySignature")]
    VerifySignature,
    #[serde(rename = "chia_getNextAddress")]
    GetNextAddress,
    #[serde(rename = "chia_getSyncStatus")]
    GetSyncStatus,
    #[serde(rename = "chia_getAllOffers")]
    GetAllOffers,
    #[serde(rename = "chia_getOffersCount")]
    GetOffersCount,
    #[serde(rename = "chia_createOfferForIds")]
    CreateOfferForIds,
    #[serde(rename = "chia_cancelOffer")]
    CancelOffer,
    #[serde(rename = "chia_checkOfferValidity")]
    CheckOfferValidity,
    #[serde(rename = "chia_takeOffer")]
    TakeOffer,
    #[serde(rename = "chia_getOfferSummary")]
    GetOfferSummary,
    #[serde(rename = "chia_getOfferData")]
    GetOfferData,
    #[serde(rename = "chia_getOfferRecord")]
    GetOfferRecord,
    #[serde(rename = "chia_createNewCATWallet")]
    CreateNewCatWallet,
    #[serde(rename = "chia_getCATWalletInfo")]
    GetCatWalletInfo,
    #[serde(rename = "chia_getCATAssetId")]
    GetCatAssetId,
    #[serde(rename = "chia_spendCAT")]
    SpendCat,
    #[serde(rename = "chia_addCATToken")]
    AddCatToken,
    #[serde(rename = "chia_getNFTs")]
    GetNfts,
    #[serde(rename = "chia_getNFTInfo")]
    GetNftInfo,
    #[serde(rename = "chia_transferNFT")]
    TransferNft,
    #[serde(rename = "chia_getNFTsCount")]
    GetNftsCount,
    #[serde(rename = "chia_createNewDIDWallet")]
    CreateNewDidWallet,
    #[serde(rename = "chia_setDIDName")]
    SetDidName,
    #[serde(rename = "chia_setNFTDID")]
    SetNftDid,
    #[serde(rename = "chia_getNFTWalletsWithDIDs")]
    GetNftWalletsWithDids,
}

impl ChiaMethod {
    pub const ALL: [ChiaMethod; 33] = [
        Self::LogIn,
        Self::GetWallets,
        Self::GetTransaction,
        Self::GetWalletBalance,
        Self::GetCurrentAddress,
        Self::SendTransaction,
        Self::SignMessageById,
        Self::SignMessageByAddress,
        Self::VerifySignature,
        Self::GetNextAddress,
        Self::GetSyncStatus,
        Self::GetAllOffers,
        Self::GetOffersCount,
        Self::CreateOfferForIds,
        Self::CancelOffer,
        Self::CheckOfferValidity,
        Self::TakeOffer,
        Self::GetOfferSummary,
        Self::GetOfferData,
        Self::GetOfferRecord,
        Self::CreateNewCatWallet,
        Self::GetCatWalletInfo,
        Self::GetCatAssetId,
        Self::SpendCat,
        Self::AddCatToken,
        Self::GetNfts,
        Self::GetNftInfo,
        Self::TransferNft,
        Self::GetNftsCount,
        Self::CreateNewDidWallet,
        Self::SetDidName,
        Self::SetNftDid,
        Self::GetNftWalletsWithDids,
    ];

    /// Wire names of every method, in declaration order
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|m| m.to_string()).collect()
    }
}

impl Display for ChiaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_plain::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{name}")
    }
}

impl FromStr for ChiaMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_plain::from_str(s).map_err(|e| e.into())
    }
}

/// Chia wallets do not emit session events.
pub const CHIA_EVENTS: [&str; 0] = [];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<String>>,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub icons: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "publicKey")]
    pub public_key: String,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub topic: String,
    #[serde(rename = "pairingTopic")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairing_topic: Option<String>,
    pub expiry: u64,
    #[serde(default)]
    pub namespaces: HashMap<String, Namespace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer: Option<Participant>,
}

impl Session {
    /// Accounts approved across all namespaces, `chia:<network>:<fingerprint>`
    pub fn accounts(&self) -> Vec<&str> {
        let mut accounts: Vec<&str> = self
            .namespaces
            .values()
            .flat_map(|ns| ns.accounts.iter().flatten())
            .map(String::as_str)
            .collect();
        accounts.sort_unstable();
        accounts
    }

    /// Key fingerprints of the Chia accounts shared by the wallet
    pub fn fingerprints(&self) -> Vec<u32> {
        self.namespaces
            .get(CHIA_NAMESPACE)
            .and_then(|ns| ns.accounts.as_ref())
            .map(|accounts| {
                accounts
                    .iter()
                    .filter_map(|a| a.rsplit(':').next())
                    .filter_map(|fp| fp.parse().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.expiry <= now
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub topic: String,
    pub expiry: u64,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "peerMetadata")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_metadata: Option<Metadata>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorReason {
    pub code: i64,
    pub message: String,
}

impl ErrorReason {
    pub fn user_disconnected() -> Self {
        Self {
            code: USER_DISCONNECTED_CODE,
            message: USER_DISCONNECTED_MESSAGE.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectParams {
    #[serde(rename = "pairingTopic")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_topic: Option<String>,
    #[serde(rename = "requiredNamespaces")]
    pub required_namespaces: HashMap<String, Namespace>,
}

/// A session proposal that has been published but not yet approved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingSession {
    pub id: u64,
    /// Pairing URI to show the wallet. `None` when an existing pairing was
    /// reused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRequestParams {
    pub topic: String,
    #[serde(rename = "chainId")]
    pub chain_id: String,
    pub request: RpcRequest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisconnectParams {
    pub topic: String,
    pub reason: ErrorReason,
}

/// Parameters accepted by the Chia wallet methods. Unset fields are left out
/// of the request; anything not covered here goes through `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_ids: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_address: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_confirmation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_my_offers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_taken_offers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_ids_and_amounts: Option<HashMap<String, i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_dict: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_only: Option<bool>,
    #[serde(rename = "disableJSONFormatting")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_json_formatting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_coin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launcher_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RpcParams {
    pub fn with_fingerprint(fingerprint: u32) -> Self {
        Self {
            fingerprint: Some(fingerprint),
            ..Default::default()
        }
    }

    pub fn into_value(self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Outcome of an RPC call as kept in the RPC context.
///
/// On success `result` is whatever the wallet returned. On failure `valid` is
/// false and `result` carries the error message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormattedRpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub valid: bool,
    pub result: Value,
}

impl FormattedRpcResponse {
    pub fn success(method: impl Into<String>, result: Value) -> Self {
        Self {
            method: Some(method.into()),
            address: None,
            valid: true,
            result,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            method: None,
            address: None,
            valid: false,
            result: Value::String(message.into()),
        }
    }

    pub fn decode<R>(&self) -> Result<R>
    where
        R: DeserializeOwned,
    {
        if !self.valid {
            return Err(format!("RPC request failed: {}", self.result).into());
        }
        Ok(serde_json::from_value::<R>(self.result.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_chia_method_wire_names() {
        assert_eq!(ChiaMethod::LogIn.to_string(), "chia_logIn");
        assert_eq!(
            ChiaMethod::CreateNewCatWallet.to_string(),
            "chia_createNewCATWallet"
        );
        assert_eq!(
            ChiaMethod::GetNftWalletsWithDids.to_string(),
            "chia_getNFTWalletsWithDIDs"
        );
        assert_eq!(
            ChiaMethod::from_str("chia_takeOffer").unwrap(),
            ChiaMethod::TakeOffer
        );
        assert!(ChiaMethod::from_str("eth_sendTransaction").is_err());
    }

    #[test]
    fn test_chia_method_names_are_unique() {
        let mut names = ChiaMethod::names();
        assert_eq!(names.len(), 33);
        assert_eq!(names[0], "chia_logIn");
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 33);
    }

    #[test]
    fn test_rpc_params_skip_unset_fields() {
        let params = RpcParams {
            fingerprint: Some(1_234_567_890),
            wallet_id: Some(1),
            amount: Some(1_000),
            fee: Some(0),
            address: Some("txch1abc".to_string()),
            disable_json_formatting: Some(true),
            ..Default::default()
        };

        assert_eq!(
            params.into_value().unwrap(),
            json!({
                "fingerprint": 1234567890,
                "walletId": 1,
                "amount": 1000,
                "fee": 0,
                "address": "txch1abc",
                "disableJSONFormatting": true,
            })
        );
    }

    #[test]
    fn test_rpc_params_forward_extra_keys() {
        let mut params = RpcParams::with_fingerprint(42);
        params
            .extra
            .insert("includeData".to_string(), Value::Bool(true));

        assert_eq!(
            params.into_value().unwrap(),
            json!({ "fingerprint": 42, "includeData": true })
        );
    }

    #[test]
    fn test_decode_session() {
        let raw = r#"{
            "topic": "b1f3f8a4",
            "pairingTopic": "0c6a9d2e",
            "relay": { "protocol": "irn" },
            "expiry": 1743768178,
            "acknowledged": true,
            "namespaces": {
                "chia": {
                    "accounts": ["chia:testnet:1234567890", "chia:testnet:42"],
                    "methods": ["chia_logIn", "chia_getWallets"],
                    "events": []
                }
            },
            "peer": {
                "publicKey": "04f1c07b",
                "metadata": {
                    "name": "Chia Wallet",
                    "description": "Chia reference wallet",
                    "url": "https://chia.net",
                    "icons": []
                }
            }
        }"#;

        let session: Session = serde_json::from_str(raw).unwrap();
        assert_eq!(session.topic, "b1f3f8a4");
        assert_eq!(session.pairing_topic.as_deref(), Some("0c6a9d2e"));
        assert_eq!(session.fingerprints(), vec![1_234_567_890, 42]);
        assert_eq!(
            session.accounts(),
            vec!["chia:testnet:1234567890", "chia:testnet:42"]
        );
        assert!(session.namespaces["chia"].chains.is_empty());
        assert!(!session.is_expired(1743768177));
        assert!(session.is_expired(1743768178));
    }

    #[test]
    fn test_failure_envelope() {
        let failed = FormattedRpcResponse::failure("User rejected");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "valid": false, "result": "User rejected" })
        );
        assert!(failed.decode::<Value>().is_err());

        let ok = FormattedRpcResponse::success(
            ChiaMethod::GetSyncStatus.to_string(),
            json!({ "synced": true }),
        );
        assert_eq!(ok.method.as_deref(), Some("chia_getSyncStatus"));
        assert_eq!(ok.decode::<Value>().unwrap()["synced"], true);
    }
}
