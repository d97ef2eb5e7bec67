use std::collections::HashMap;
use std::sync::Mutex;

use chia_walletconnect::config::ClientOptions;
use chia_walletconnect::results::GetWalletsResult;
use chia_walletconnect::types::{
    ConnectParams, DisconnectParams, JsonRpcError, Metadata, Namespace,
    Pairing, PendingSession, Session, SessionRequestParams,
};
use chia_walletconnect::utils::unix_timestamp;
use chia_walletconnect::{
    ChiaMethod, ClientConfig, Result, RpcParams, SignClient, SignClientEvent,
    TerminalQrModal, WalletConnectClient, WalletConnectConfig,
    WalletConnectRpc,
};
use serde_json::{Value, json};
use tokio::sync::broadcast;

// Key fingerprint of the account the demo wallet shares
const FINGERPRINT: u32 = 1_234_567_890;

/// Stand-in for a real WalletConnect binding: approves every proposal and
/// answers a handful of wallet calls with canned data.
struct DemoWallet {
    sessions: Mutex<Vec<Session>>,
    pairings: Mutex<Vec<Pairing>>,
    events: broadcast::Sender<SignClientEvent>,
}

impl SignClient for DemoWallet {
    async fn init(options: ClientOptions) -> Result<Self> {
        println!("relay: {}", options.relay_url);
        let (events, _) = broadcast::channel(16);
        Ok(Self {
            sessions: Mutex::new(vec![]),
            pairings: Mutex::new(vec![]),
            events,
        })
    }

    async fn connect(&self, params: ConnectParams) -> Result<PendingSession> {
        let uri = match params.pairing_topic {
            Some(_) => None,
            None => Some(
                "wc:7f6e504bfad60b485450578e05678ed3e8e8c4751d3c6160be17160d63ec90f9@2?relay-protocol=irn&symKey=587d5484ce2a2a6ee3ba1962fdd7e8588e06200c46823bd18fbd67def96ad303"
                    .to_string(),
            ),
        };
        Ok(PendingSession { id: 1, uri })
    }

    async fn approval(&self, _pending: PendingSession) -> Result<Session> {
        let expiry = unix_timestamp()? + 7 * 24 * 60 * 60;
        let session = Session {
            topic: "demo-session".to_string(),
            pairing_topic: Some("demo-pairing".to_string()),
            expiry,
            namespaces: HashMap::from([(
                "chia".to_string(),
                Namespace {
                    accounts: Some(vec![format!("chia:testnet:{FINGERPRINT}")]),
                    chains: vec!["chia:testnet".to_string()],
                    events: vec![],
                    methods: ChiaMethod::names(),
                },
            )]),
            peer: None,
        };

        self.sessions
            .lock()
            .map_err(|e| e.to_string())?
            .push(session.clone());
        self.pairings.lock().map_err(|e| e.to_string())?.push(Pairing {
            topic: "demo-pairing".to_string(),
            expiry,
            active: true,
            peer_metadata: None,
        });
        Ok(session)
    }

    async fn request(&self, params: SessionRequestParams) -> Result<Value> {
        let args = params.request.params;
        match params.request.method.parse::<ChiaMethod>()? {
            ChiaMethod::LogIn => Ok(json!({
                "data": { "fingerprint": args["fingerprint"], "success": true },
                "isSuccess": true
            })),
            ChiaMethod::GetWallets => Ok(json!({
                "data": [
                    { "data": "", "id": 1, "name": "Chia Wallet", "type": 0 },
                    { "data": "", "id": 2, "name": "Spacebucks", "type": 6 }
                ],
                "isSuccess": true
            })),
            ChiaMethod::GetWalletBalance => Ok(json!({
                "data": {
                    "confirmedWalletBalance": 1_000_000_000_000u64,
                    "spendableBalance": 1_000_000_000_000u64,
                    "walletId": args.get("walletId").cloned().unwrap_or(json!(1))
                },
                "isSuccess": true
            })),
            method => Err(JsonRpcError {
                code: 4001,
                message: format!("{method} was rejected by the user"),
                data: None,
            }
            .into()),
        }
    }

    async fn ping(&self, _topic: &str) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&self, params: DisconnectParams) -> Result<()> {
        println!("disconnect: {}", params.reason.message);
        self.sessions
            .lock()
            .map_err(|e| e.to_string())?
            .retain(|s| s.topic != params.topic);
        Ok(())
    }

    fn pairings(&self, active_only: bool) -> Vec<Pairing> {
        self.pairings
            .lock()
            .map(|pairings| {
                pairings
                    .iter()
                    .filter(|p| p.active || !active_only)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn sessions(&self) -> Vec<Session> {
        self.sessions
            .lock()
            .map(|sessions| sessions.clone())
            .unwrap_or_default()
    }

    fn session(&self, topic: &str) -> Option<Session> {
        self.sessions().into_iter().find(|s| s.topic == topic)
    }

    fn events(&self) -> broadcast::Receiver<SignClientEvent> {
        self.events.subscribe()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // ProjectId is required by the relay. Create your own at
    // https://cloud.reown.com when using a real sign client.
    let config = WalletConnectConfig {
        project_id: "35d44d49c2dee217a3eb24bb4410acc7".to_string(),
        metadata: Metadata {
            name: "Chia WalletConnect demo".to_string(),
            description: "Lists wallets and balances of a Chia wallet"
                .to_string(),
            url: "https://github.com/Chia-Network".to_string(),
            icons: vec![],
        },
    };

    let client: WalletConnectClient<DemoWallet> =
        WalletConnectClient::new(ClientConfig::new(config), TerminalQrModal);
    client.ensure_client().await?;

    // Shows the pairing URI as a QR code, then waits for the wallet
    let Some(session) = client.connect(None).await? else {
        println!("wallet rejected the session");
        return Ok(());
    };
    println!("session: {} accounts: {:?}", session.topic, session.accounts());

    let rpc = WalletConnectRpc::new(client.clone());
    println!("ping: {}", rpc.ping().await?);

    let login = rpc.log_in(RpcParams::with_fingerprint(FINGERPRINT)).await?;
    println!("logIn: {login:?}");

    let wallets = rpc
        .get_wallets(RpcParams::with_fingerprint(FINGERPRINT))
        .await?
        .decode::<GetWalletsResult>()?;
    for wallet in &wallets.data {
        println!("wallet {}: {} ({:?})", wallet.id, wallet.name, wallet.wallet_type);
    }

    let balance = rpc
        .get_wallet_balance(RpcParams {
            fingerprint: Some(FINGERPRINT),
            wallet_id: Some(1),
            ..Default::default()
        })
        .await?;
    println!("balance: {}", balance.result["data"]);

    // Wallet-side failures come back as an invalid envelope, not an error
    let offer = rpc
        .take_offer(RpcParams {
            fingerprint: Some(FINGERPRINT),
            offer: Some("offer1qqr83wcuu2rykcmqvps8".to_string()),
            ..Default::default()
        })
        .await?;
    println!("takeOffer valid={} result={}", offer.valid, offer.result);

    client.disconnect().await;
    println!("connected after disconnect: {}", client.snapshot().await.connected);
    Ok(())
}
