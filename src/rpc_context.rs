/// RPC context
///
/// Sends Chia wallet requests over the session held by a
/// [`WalletConnectClient`] and keeps the last outcome around for display.
/// Every named method goes through the same handler: check there is a client
/// and a session, mark the request pending, forward the parameters verbatim
/// and wrap whatever comes back in a [`FormattedRpcResponse`].
///
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error};
use tokio::sync::RwLock;

use crate::client_context::WalletConnectClient;
use crate::constants::DEFAULT_CHAIN_ID;
use crate::error::Result;
use crate::qr::{QrCodeModal, TerminalQrModal};
use crate::sign_client::SignClient;
use crate::types::{
    ChiaMethod, FormattedRpcResponse, RpcParams, RpcRequest, Session,
    SessionRequestParams,
};
use crate::utils::BusyGuard;

struct RpcState {
    result: Option<FormattedRpcResponse>,
    chain_id: String,
}

pub struct WalletConnectRpc<C, Q = TerminalQrModal> {
    client: WalletConnectClient<C, Q>,
    state: Arc<RwLock<RpcState>>,
    pending: Arc<AtomicBool>,
}

impl<C, Q> Clone for WalletConnectRpc<C, Q> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            state: Arc::clone(&self.state),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<C: SignClient, Q: QrCodeModal> WalletConnectRpc<C, Q> {
    pub fn new(client: WalletConnectClient<C, Q>) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(RpcState {
                result: None,
                chain_id: DEFAULT_CHAIN_ID.to_string(),
            })),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn client(&self) -> &WalletConnectClient<C, Q> {
        &self.client
    }

    pub async fn chain_id(&self) -> String {
        self.state.read().await.chain_id.clone()
    }

    pub async fn set_chain_id(&self, chain_id: impl Into<String>) {
        self.state.write().await.chain_id = chain_id.into();
    }

    pub async fn rpc_result(&self) -> Option<FormattedRpcResponse> {
        self.state.read().await.result.clone()
    }

    pub fn is_rpc_request_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Pings the wallet over the session topic. Errors only when there is no
    /// client or session; an unanswered ping is `Ok(false)`.
    pub async fn ping(&self) -> Result<bool> {
        let (client, session) = self.client.connected().await?;

        let _pending = BusyGuard::raise(&self.pending);
        let alive = match client.ping(&session.topic).await {
            Ok(()) => true,
            Err(e) => {
                error!("ping failed: {e}");
                false
            }
        };

        Ok(alive)
    }

    /// Sends `method` with `params` and records the outcome.
    ///
    /// Errors only when there is no client or session. Wallet-side failures
    /// come back as `Ok` with `valid: false`.
    pub async fn request(
        &self,
        method: ChiaMethod,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        let (client, session) = self.client.connected().await?;

        let _pending = BusyGuard::raise(&self.pending);
        let response =
            match self.standard_request(&client, &session, method, params).await
            {
                Ok(response) => response,
                Err(e) => {
                    error!("RPC request failed: {e}");
                    FormattedRpcResponse::failure(e.to_string())
                }
            };

        self.state.write().await.result = Some(response.clone());
        Ok(response)
    }

    async fn standard_request(
        &self,
        client: &C,
        session: &Session,
        method: ChiaMethod,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        let method = method.to_string();
        let request = SessionRequestParams {
            topic: session.topic.clone(),
            chain_id: self.chain_id().await,
            request: RpcRequest {
                method: method.clone(),
                params: params.into_value()?,
            },
        };
        debug!("request {method} on {}", request.chain_id);

        let result = client.request(request).await?;
        Ok(FormattedRpcResponse::success(method, result))
    }

    /// fingerprint
    pub async fn log_in(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::LogIn, params).await
    }

    /// fingerprint
    pub async fn get_wallets(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetWallets, params).await
    }

    /// fingerprint, transaction_id
    pub async fn get_transaction(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetTransaction, params).await
    }

    /// fingerprint, wallet_id (optional)
    pub async fn get_wallet_balance(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetWalletBalance, params).await
    }

    /// fingerprint, wallet_id (optional)
    pub async fn get_current_address(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetCurrentAddress, params).await
    }

    /// fingerprint, amount, fee, address, wallet_id, wait_for_confirmation
    /// (optional)
    pub async fn send_transaction(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::SendTransaction, params).await
    }

    /// fingerprint, id, message
    pub async fn sign_message_by_id(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::SignMessageById, params).await
    }

    /// fingerprint, address, message
    pub async fn sign_message_by_address(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::SignMessageByAddress, params).await
    }

    /// fingerprint, pubkey, message, signature, address (optional)
    pub async fn verify_signature(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::VerifySignature, params).await
    }

    /// fingerprint, wallet_id (optional), new_address (optional)
    pub async fn get_next_address(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetNextAddress, params).await
    }

    pub async fn get_sync_status(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetSyncStatus, params).await
    }

    /// fingerprint, start, end, sort_key, reverse, include_my_offers,
    /// include_taken_offers (all optional but fingerprint)
    pub async fn get_all_offers(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetAllOffers, params).await
    }

    pub async fn get_offers_count(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetOffersCount, params).await
    }

    /// fingerprint, wallet_ids_and_amounts, driver_dict, validate_only
    /// (optional), disable_json_formatting (optional)
    pub async fn create_offer_for_ids(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::CreateOfferForIds, params).await
    }

    /// fingerprint, trade_id, secure, fee
    pub async fn cancel_offer(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::CancelOffer, params).await
    }

    /// fingerprint, offer_data
    pub async fn check_offer_validity(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::CheckOfferValidity, params).await
    }

    /// fingerprint, offer, fee
    pub async fn take_offer(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::TakeOffer, params).await
    }

    /// fingerprint, offer_data
    pub async fn get_offer_summary(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetOfferSummary, params).await
    }

    /// fingerprint, offer_id
    pub async fn get_offer_data(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetOfferData, params).await
    }

    /// fingerprint, offer_id
    pub async fn get_offer_record(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetOfferRecord, params).await
    }

    /// fingerprint, amount, fee
    pub async fn create_new_cat_wallet(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::CreateNewCatWallet, params).await
    }

    /// fingerprint, asset_id
    pub async fn get_cat_wallet_info(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetCatWalletInfo, params).await
    }

    /// fingerprint, wallet_id
    pub async fn get_cat_asset_id(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetCatAssetId, params).await
    }

    /// fingerprint, wallet_id, address, amount, fee, memos (optional),
    /// wait_for_confirmation (optional)
    pub async fn spend_cat(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::SpendCat, params).await
    }

    /// fingerprint, asset_id, name
    pub async fn add_cat_token(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::AddCatToken, params).await
    }

    /// fingerprint, wallet_ids
    pub async fn get_nfts(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetNfts, params).await
    }

    /// fingerprint, coin_id
    pub async fn get_nft_info(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetNftInfo, params).await
    }

    /// fingerprint, wallet_id, nft_coin_id, launcher_id, target_address, fee
    pub async fn transfer_nft(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::TransferNft, params).await
    }

    /// fingerprint, wallet_ids
    pub async fn get_nfts_count(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetNftsCount, params).await
    }

    /// fingerprint, amount, fee
    pub async fn create_new_did_wallet(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::CreateNewDidWallet, params).await
    }

    /// fingerprint, wallet_id, name
    pub async fn set_did_name(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::SetDidName, params).await
    }

    /// fingerprint, wallet_id, nft_coin_id, launcher_id, did, fee
    pub async fn set_nft_did(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::SetNftDid, params).await
    }

    pub async fn get_nft_wallets_with_dids(
        &self,
        params: RpcParams,
    ) -> Result<FormattedRpcResponse> {
        self.request(ChiaMethod::GetNftWalletsWithDids, params).await
    }
}
