/// Mock sign client
///
/// In-memory sign client for tests. `SignClient::init` only receives options,
/// so behaviour is registered per project id before the context creates the
/// client.
///
use std::collections::HashMap;
use std::future;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::broadcast;

use crate::config::{ClientConfig, ClientOptions, WalletConnectConfig};
use crate::error::Result;
use crate::sign_client::{SignClient, SignClientEvent};
use crate::types::{
    ConnectParams, DisconnectParams, JsonRpcError, Metadata, Namespace,
    Pairing, PendingSession, Session, SessionRequestParams,
};

static REGISTRY: LazyLock<Mutex<HashMap<String, Arc<MockState>>>> =
    LazyLock::new(Default::default);

#[derive(Default)]
pub struct MockInner {
    pub fail_init: bool,
    /// Never resolve `init`
    pub hang_init: bool,
    pub init_calls: Vec<ClientOptions>,
    pub uri: Option<String>,
    pub connect_calls: Vec<ConnectParams>,
    /// Session handed out on approval, `None` rejects the proposal
    pub approve_with: Option<Session>,
    /// Never resolve `approval`, as if the wallet never answered
    pub hang_approval: bool,
    pub request_calls: Vec<SessionRequestParams>,
    pub responses: HashMap<String, std::result::Result<Value, JsonRpcError>>,
    /// Never resolve `request`
    pub hang_request: bool,
    pub ping_fails: bool,
    pub ping_calls: Vec<String>,
    pub disconnect_fails: bool,
    pub disconnect_calls: Vec<DisconnectParams>,
    pub pairings: Vec<Pairing>,
    pub sessions: Vec<Session>,
}

pub struct MockState {
    inner: Mutex<MockInner>,
    pub events: broadcast::Sender<SignClientEvent>,
}

impl MockState {
    pub fn register(project_id: &str) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        let state = Arc::new(Self {
            inner: Mutex::new(MockInner::default()),
            events,
        });
        REGISTRY
            .lock()
            .unwrap()
            .insert(project_id.to_string(), Arc::clone(&state));
        state
    }

    pub fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap()
    }
}

pub struct MockSignClient {
    state: Arc<MockState>,
}

impl SignClient for MockSignClient {
    async fn init(options: ClientOptions) -> Result<Self> {
        let state = REGISTRY
            .lock()
            .unwrap()
            .get(&options.project_id)
            .cloned()
            .ok_or("mock not registered")?;
        let hang = {
            let mut inner = state.lock();
            inner.init_calls.push(options);
            if inner.fail_init {
                return Err("relay unreachable".into());
            }
            inner.hang_init
        };
        if hang {
            future::pending::<()>().await;
        }
        Ok(Self { state })
    }

    async fn connect(&self, params: ConnectParams) -> Result<PendingSession> {
        let mut inner = self.state.lock();
        let uri = match params.pairing_topic {
            Some(_) => None,
            None => inner.uri.clone(),
        };
        inner.connect_calls.push(params);
        Ok(PendingSession { id: 1, uri })
    }

    async fn approval(&self, _pending: PendingSession) -> Result<Session> {
        let hang = self.state.lock().hang_approval;
        if hang {
            future::pending::<()>().await;
        }
        let mut inner = self.state.lock();
        let session = inner.approve_with.clone().ok_or("User rejected.")?;
        inner.sessions.push(session.clone());
        inner.pairings.push(pairing("pairing-topic", true));
        Ok(session)
    }

    async fn request(&self, params: SessionRequestParams) -> Result<Value> {
        let (hang, response) = {
            let mut inner = self.state.lock();
            let response = inner.responses.get(&params.request.method).cloned();
            inner.request_calls.push(params);
            (inner.hang_request, response)
        };
        if hang {
            future::pending::<()>().await;
        }
        match response {
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) => Err(e.into()),
            None => Err("no mocked response".into()),
        }
    }

    async fn ping(&self, topic: &str) -> Result<()> {
        let mut inner = self.state.lock();
        inner.ping_calls.push(topic.to_string());
        if inner.ping_fails {
            return Err("ping timed out".into());
        }
        Ok(())
    }

    async fn disconnect(&self, params: DisconnectParams) -> Result<()> {
        let mut inner = self.state.lock();
        inner.disconnect_calls.push(params.clone());
        inner.sessions.retain(|s| s.topic != params.topic);
        if inner.disconnect_fails {
            return Err("No matching key. session topic doesn't exist".into());
        }
        Ok(())
    }

    fn pairings(&self, active_only: bool) -> Vec<Pairing> {
        self.state
            .lock()
            .pairings
            .iter()
            .filter(|p| p.active || !active_only)
            .cloned()
            .collect()
    }

    fn sessions(&self) -> Vec<Session> {
        self.state.lock().sessions.clone()
    }

    fn session(&self, topic: &str) -> Option<Session> {
        self.state
            .lock()
            .sessions
            .iter()
            .find(|s| s.topic == topic)
            .cloned()
    }

    fn events(&self) -> broadcast::Receiver<SignClientEvent> {
        self.state.events.subscribe()
    }
}

pub fn config(project_id: &str) -> ClientConfig {
    ClientConfig::new(WalletConnectConfig {
        project_id: project_id.to_string(),
        metadata: Metadata {
            name: "Chia dApp".to_string(),
            description: "Test dApp".to_string(),
            url: "https://example.org".to_string(),
            icons: vec![],
        },
    })
}

pub fn session(topic: &str, fingerprint: u32) -> Session {
    Session {
        topic: topic.to_string(),
        pairing_topic: Some("pairing-topic".to_string()),
        expiry: 4_102_444_800,
        namespaces: HashMap::from([(
            "chia".to_string(),
            Namespace {
                accounts: Some(vec![format!("chia:testnet:{fingerprint}")]),
                chains: vec!["chia:testnet".to_string()],
                events: vec![],
                methods: vec!["chia_logIn".to_string()],
            },
        )]),
        peer: None,
    }
}

pub fn pairing(topic: &str, active: bool) -> Pairing {
    Pairing {
        topic: topic.to_string(),
        expiry: 4_102_444_800,
        active,
        peer_metadata: None,
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
