//! # chia-walletconnect
//!
//! Connect a dApp to a Chia wallet over
//! [WalletConnect v2](https://specs.walletconnect.com/2.0/) and call the
//! wallet's `chia_*` JSON-RPC methods.
//!
//! ## Features
//! - Session proposal with the Chia namespace and all wallet methods
//! - Pairing URI shown as a QR code in the terminal
//! - Session, pairing and last RPC result kept for a view layer to read
//! - One call per Chia wallet method, with typed decoding of common results
//!
//! The relay protocol, pairing crypto and session storage are left to the
//! WalletConnect sign client, plugged in through [`SignClient`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = WalletConnectConfig::from_path("walletconnectconfig.json")?;
//! let client: WalletConnectClient<MySignClient> =
//!     WalletConnectClient::new(ClientConfig::new(config), TerminalQrModal);
//!
//! client.ensure_client().await?;
//! if client.session().await.is_none() {
//!     client.connect(None).await?;
//! }
//!
//! let rpc = WalletConnectRpc::new(client.clone());
//! let fingerprint = client.snapshot().await.fingerprints[0];
//! let balance = rpc
//!     .get_wallet_balance(RpcParams {
//!         fingerprint: Some(fingerprint),
//!         wallet_id: Some(1),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!("balance: {}", balance.result);
//! ```
//!
//! ## License
//! MIT OR Apache-2.0

pub mod chains;
pub mod client_context;
pub mod config;
pub mod constants;
pub mod error;
pub mod namespaces;
pub mod qr;
pub mod results;
pub mod rpc_context;
pub mod sign_client;
pub mod types;
pub mod utils;

#[cfg(test)]
mod mock;

/// Exposed for easy access
pub use client_context::WalletConnectClient;
pub use config::{ClientConfig, WalletConnectConfig};
pub use error::{Error, Result};
pub use qr::{NoopQrModal, QrCodeModal, TerminalQrModal};
pub use rpc_context::WalletConnectRpc;
pub use sign_client::{SignClient, SignClientEvent};
pub use types::{ChiaMethod, FormattedRpcResponse, RpcParams};
