/// Results
///
/// Shapes of the payloads the Chia wallet sends back for the calls a dApp
/// usually inspects. Decode them out of a `FormattedRpcResponse` with
/// `decode::<WalletResponse<T>>()`.
///
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WalletType {
    Standard = 0,
    RateLimited = 1,
    AtomicSwap = 2,
    AuthorizedPayee = 3,
    Multisig = 4,
    Custody = 5,
    Cat = 6,
    Recoverable = 7,
    Did = 8,
    Pooling = 9,
    Nft = 10,
    DataLayer = 11,
    DataLayerOffer = 12,
}

impl TryFrom<u8> for WalletType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Standard,
            1 => Self::RateLimited,
            2 => Self::AtomicSwap,
            3 => Self::AuthorizedPayee,
            4 => Self::Multisig,
            5 => Self::Custody,
            6 => Self::Cat,
            7 => Self::Recoverable,
            8 => Self::Did,
            9 => Self::Pooling,
            10 => Self::Nft,
            11 => Self::DataLayer,
            12 => Self::DataLayerOffer,
            other => return Err(format!("unknown wallet type {other}")),
        })
    }
}

impl From<WalletType> for u8 {
    fn from(value: WalletType) -> Self {
        value as u8
    }
}

/// Envelope the wallet wraps every result in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse<T> {
    pub data: T,
    #[serde(default)]
    pub endpoint_name: Option<String>,
    #[serde(default)]
    pub fulfilled_time_stamp: Option<u64>,
    #[serde(default)]
    pub started_time_stamp: Option<u64>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub is_success: bool,
    #[serde(default)]
    pub is_uninitialized: bool,
    #[serde(default)]
    pub original_args: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMetadata {
    pub asset_id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub data: String,
    pub id: u32,
    #[serde(default)]
    pub meta: Option<WalletMetadata>,
    pub name: String,
    #[serde(rename = "type")]
    pub wallet_type: WalletType,
}

pub type GetWalletsResult = WalletResponse<Vec<WalletInfo>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    #[serde(rename = "$nftId")]
    pub nft_id: String,
    pub chain_info: String,
    pub data_hash: String,
    pub data_uris: Vec<String>,
    pub edition_number: u32,
    pub edition_total: u32,
    pub launcher_id: String,
    pub launcher_puzhash: String,
    pub license_hash: String,
    pub license_uris: Vec<String>,
    pub metadata_hash: String,
    pub metadata_uris: Vec<String>,
    pub mint_height: u32,
    #[serde(default)]
    pub minter_did: Option<String>,
    pub nft_coin_id: String,
    #[serde(default)]
    pub off_chain_metadata: Option<String>,
    #[serde(default)]
    pub owner_did: Option<String>,
    pub p2_address: String,
    pub pending_transaction: bool,
    pub royalty_percentage: u32,
    #[serde(default)]
    pub royalty_puzzle_hash: Option<String>,
    pub supports_did: bool,
    pub updater_puzhash: String,
    pub wallet_id: u32,
}

/// NFTs keyed by the wallet id they were requested for
pub type GetNftsResult = WalletResponse<HashMap<String, Vec<Nft>>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignMessage {
    pub signature: String,
    pub pubkey: String,
}

pub type SignMessageByIdResult = WalletResponse<SignMessage>;
