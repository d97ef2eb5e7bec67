/// Client context
///
/// Holds the sign client handle and mirrors what it knows about the current
/// session and pairings so a view layer can read it. Cloning the context is
/// cheap; all clones share the same state.
///
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::config::{ClientConfig, ClientOptions, validate_relay_url};
use crate::error::{Error, Result};
use crate::namespaces::required_namespaces;
use crate::qr::{QrCodeModal, TerminalQrModal};
use crate::sign_client::{SignClient, SignClientEvent};
use crate::types::{
    ConnectParams, DisconnectParams, ErrorReason, Pairing, Session,
};
use crate::utils::{BusyGuard, unix_timestamp};

struct ClientState<C> {
    client: Option<Arc<C>>,
    session: Option<Session>,
    pairings: Vec<Pairing>,
    relayer_region: String,
    // Relay the current client was created with
    prev_relayer_region: String,
    event_task: Option<JoinHandle<()>>,
}

/// Serializable view of the connection state
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientSnapshot {
    #[serde(rename = "isInitializing")]
    pub is_initializing: bool,
    #[serde(rename = "relayerRegion")]
    pub relayer_region: String,
    pub initialized: bool,
    pub connected: bool,
    pub session: Option<Session>,
    pub pairings: Vec<Pairing>,
    pub fingerprints: Vec<u32>,
}

pub struct WalletConnectClient<C, Q = TerminalQrModal> {
    state: Arc<RwLock<ClientState<C>>>,
    is_initializing: Arc<AtomicBool>,
    config: Arc<ClientConfig>,
    qr_modal: Arc<Q>,
}

/// Closes the QR modal once a proposal is settled, abandoned or cancelled
struct ModalGuard<'a, Q: QrCodeModal>(&'a Q);

impl<Q: QrCodeModal> Drop for ModalGuard<'_, Q> {
    fn drop(&mut self) {
        self.0.close();
    }
}

impl<C, Q> Clone for WalletConnectClient<C, Q> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            is_initializing: Arc::clone(&self.is_initializing),
            config: Arc::clone(&self.config),
            qr_modal: Arc::clone(&self.qr_modal),
        }
    }
}

impl<C: SignClient, Q: QrCodeModal> WalletConnectClient<C, Q> {
    pub fn new(config: ClientConfig, qr_modal: Q) -> Self {
        let relayer_region = config.default_relay_url.clone();
        Self {
            state: Arc::new(RwLock::new(ClientState {
                client: None,
                session: None,
                pairings: vec![],
                relayer_region,
                prev_relayer_region: String::new(),
                event_task: None,
            })),
            is_initializing: Arc::new(AtomicBool::new(true)),
            config: Arc::new(config),
            qr_modal: Arc::new(qr_modal),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn qr_modal(&self) -> &Q {
        &self.qr_modal
    }

    pub async fn client(&self) -> Option<Arc<C>> {
        self.state.read().await.client.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    pub async fn pairings(&self) -> Vec<Pairing> {
        self.state.read().await.pairings.clone()
    }

    pub fn is_initializing(&self) -> bool {
        self.is_initializing.load(Ordering::SeqCst)
    }

    pub async fn relayer_region(&self) -> String {
        self.state.read().await.relayer_region.clone()
    }

    /// Selects the relay for the next client. Takes effect on the next
    /// `ensure_client` call.
    pub async fn set_relayer_region(&self, relay_url: &str) -> Result<()> {
        validate_relay_url(relay_url)?;
        self.state.write().await.relayer_region = relay_url.to_string();
        Ok(())
    }

    pub async fn snapshot(&self) -> ClientSnapshot {
        let state = self.state.read().await;
        ClientSnapshot {
            is_initializing: self.is_initializing(),
            relayer_region: state.relayer_region.clone(),
            initialized: state.client.is_some(),
            connected: state.session.is_some(),
            session: state.session.clone(),
            pairings: state.pairings.clone(),
            fingerprints: state
                .session
                .as_ref()
                .map(Session::fingerprints)
                .unwrap_or_default(),
        }
    }

    /// Client and session needed to send a request
    pub(crate) async fn connected(&self) -> Result<(Arc<C>, Session)> {
        let state = self.state.read().await;
        let client = state.client.clone().ok_or(Error::NotInitialized)?;
        let session = state.session.clone().ok_or(Error::SessionNotConnected)?;
        Ok((client, session))
    }

    /// Creates the client if there is none yet or the relay region changed
    pub async fn ensure_client(&self) -> Result<Arc<C>> {
        let (client, region_changed) = {
            let state = self.state.read().await;
            (
                state.client.clone(),
                state.prev_relayer_region != state.relayer_region,
            )
        };
        match client {
            Some(client) if !region_changed => Ok(client),
            _ => self.create_client().await,
        }
    }

    pub async fn create_client(&self) -> Result<Arc<C>> {
        let relayer_region = self.state.read().await.relayer_region.clone();

        let _initializing = BusyGuard::raise(&self.is_initializing);
        self.init_client(relayer_region)
            .await
            .inspect_err(|e| error!("failed to create client: {e}"))
    }

    async fn init_client(&self, relayer_region: String) -> Result<Arc<C>> {
        let options = ClientOptions {
            logger: self.config.logger.clone(),
            relay_url: relayer_region.clone(),
            project_id: self.config.walletconnect.project_id.clone(),
            metadata: self.config.walletconnect.metadata.clone(),
        };
        let client = Arc::new(C::init(options).await?);
        info!("created client, relayer region {relayer_region}");

        let event_task = self.subscribe_to_events(&client);
        {
            let mut state = self.state.write().await;
            if let Some(previous) = state.event_task.replace(event_task) {
                previous.abort();
            }
            state.client = Some(Arc::clone(&client));
            state.prev_relayer_region = relayer_region;
        }

        self.check_persisted_state(&client).await;
        Ok(client)
    }

    /// Forwards client events into this context until the client goes away.
    /// The task only keeps a weak reference to the state.
    fn subscribe_to_events(&self, client: &C) -> JoinHandle<()> {
        let mut events = client.events();
        let state = Arc::downgrade(&self.state);
        let is_initializing = Arc::clone(&self.is_initializing);
        let config = Arc::clone(&self.config);
        let qr_modal = Arc::clone(&self.qr_modal);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(state) = state.upgrade() else {
                            break;
                        };
                        let context = Self {
                            state,
                            is_initializing: Arc::clone(&is_initializing),
                            config: Arc::clone(&config),
                            qr_modal: Arc::clone(&qr_modal),
                        };
                        context.handle_event(event).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("missed {skipped} client events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    pub async fn handle_event(&self, event: SignClientEvent) {
        info!("EVENT {} {}", event.name(), event.topic());
        match event {
            SignClientEvent::SessionPing { .. } => {}
            SignClientEvent::SessionEvent { params, .. } => {
                debug!("session_event params: {params}");
            }
            SignClientEvent::SessionUpdate { topic, namespaces } => {
                let stored = self.client().await.and_then(|c| c.session(&topic));
                let mut state = self.state.write().await;
                let current = state.session.clone().filter(|s| s.topic == topic);
                match stored.or(current) {
                    Some(session) => {
                        state.session = Some(Session {
                            namespaces,
                            ..session
                        });
                    }
                    None => warn!("session_update for unknown session {topic}"),
                }
            }
            SignClientEvent::SessionDelete { .. } => self.reset().await,
        }
    }

    /// Restores pairings and, unless a session is already held, the most
    /// recent unexpired session the client persisted.
    async fn check_persisted_state(&self, client: &C) {
        let pairings = client.pairings(true);
        debug!("restored {} pairings", pairings.len());

        let mut state = self.state.write().await;
        state.pairings = pairings;
        if state.session.is_some() {
            return;
        }

        let now = expiry_cutoff(unix_timestamp());
        if let Some(session) = client
            .sessions()
            .into_iter()
            .rev()
            .find(|s| !s.is_expired(now))
        {
            info!("restored session {}", session.topic);
            state.session = Some(session);
        }
    }

    /// Proposes a session, over `pairing` when given, otherwise over a new
    /// pairing whose URI is shown in the QR modal.
    ///
    /// A rejected or failed proposal disconnects and yields `Ok(None)`. The
    /// modal is closed however the call ends, dropping the future included.
    pub async fn connect(
        &self,
        pairing: Option<&Pairing>,
    ) -> Result<Option<Session>> {
        let client = self.client().await.ok_or(Error::NotInitialized)?;
        let pairing_topic = pairing.map(|p| p.topic.clone());
        debug!("connect, pairing topic is: {pairing_topic:?}");

        let _modal = ModalGuard(self.qr_modal.as_ref());
        match self.propose_session(&client, pairing_topic).await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("session proposal failed: {e}");
                self.disconnect().await;
                Ok(None)
            }
        }
    }

    async fn propose_session(
        &self,
        client: &C,
        pairing_topic: Option<String>,
    ) -> Result<Session> {
        let required_namespaces = required_namespaces(&self.config.chains)?;
        debug!("required namespaces: {required_namespaces:?}");

        let pending = client
            .connect(ConnectParams {
                pairing_topic,
                required_namespaces,
            })
            .await?;
        if let Some(uri) = &pending.uri {
            self.qr_modal.open(uri)?;
        }

        let session = client.approval(pending).await?;
        info!("established session {}", session.topic);

        let mut state = self.state.write().await;
        state.session = Some(session.clone());
        state.pairings = client.pairings(true);
        Ok(session)
    }

    /// Tells the wallet the user disconnected, then resets local state.
    /// Failures from the client are only logged.
    pub async fn disconnect(&self) {
        let (client, topic) = {
            let state = self.state.read().await;
            (
                state.client.clone(),
                state
                    .session
                    .as_ref()
                    .map(|s| s.topic.clone())
                    .unwrap_or_default(),
            )
        };

        if let Some(client) = client {
            let params = DisconnectParams {
                topic,
                reason: ErrorReason::user_disconnected(),
            };
            if let Err(e) = client.disconnect(params).await {
                error!("disconnect failed: {e}");
            }
        }

        self.reset().await;
    }

    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.session = None;
        state.pairings.clear();
        state.relayer_region = self.config.default_relay_url.clone();
    }
}

/// Sessions expiring at or before this are skipped on restore. Without a
/// clock nothing counts as expired.
fn expiry_cutoff(now: Result<u64>) -> u64 {
    now.unwrap_or_else(|e| {
        warn!("{e}, treating persisted sessions as unexpired");
        0
    })
}
