/// Sign client
///
/// The WalletConnect v2 sign client this crate drives. Relay transport,
/// pairing crypto and session storage all live behind this trait; an SDK
/// binding implements it and the contexts only call through it.
///
use std::collections::HashMap;
use std::future::Future;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::config::ClientOptions;
use crate::error::Result;
use crate::types::{
    ConnectParams, DisconnectParams, Namespace, Pairing, PendingSession,
    Session, SessionRequestParams,
};

/// Events the sign client emits about live sessions
#[derive(Clone, Debug, PartialEq)]
pub enum SignClientEvent {
    SessionPing {
        topic: String,
    },
    SessionEvent {
        topic: String,
        params: Value,
    },
    SessionUpdate {
        topic: String,
        namespaces: HashMap<String, Namespace>,
    },
    SessionDelete {
        topic: String,
    },
}

impl SignClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionPing { .. } => "session_ping",
            Self::SessionEvent { .. } => "session_event",
            Self::SessionUpdate { .. } => "session_update",
            Self::SessionDelete { .. } => "session_delete",
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            Self::SessionPing { topic }
            | Self::SessionEvent { topic, .. }
            | Self::SessionUpdate { topic, .. }
            | Self::SessionDelete { topic } => topic,
        }
    }
}

pub trait SignClient: Send + Sync + Sized + 'static {
    fn init(options: ClientOptions) -> impl Future<Output = Result<Self>> + Send;

    /// Publishes a session proposal. The returned URI is `None` when the
    /// proposal went over an existing pairing.
    fn connect(
        &self,
        params: ConnectParams,
    ) -> impl Future<Output = Result<PendingSession>> + Send;

    /// Resolves once the wallet approves (or rejects) the proposal
    fn approval(
        &self,
        pending: PendingSession,
    ) -> impl Future<Output = Result<Session>> + Send;

    fn request(
        &self,
        params: SessionRequestParams,
    ) -> impl Future<Output = Result<Value>> + Send;

    fn ping(&self, topic: &str) -> impl Future<Output = Result<()>> + Send;

    fn disconnect(
        &self,
        params: DisconnectParams,
    ) -> impl Future<Output = Result<()>> + Send;

    fn pairings(&self, active_only: bool) -> Vec<Pairing>;

    /// Known sessions, oldest first
    fn sessions(&self) -> Vec<Session>;

    fn session(&self, topic: &str) -> Option<Session>;

    fn events(&self) -> broadcast::Receiver<SignClientEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_and_topic() {
        let event = SignClientEvent::SessionUpdate {
            topic: "abc".to_string(),
            namespaces: HashMap::new(),
        };
        assert_eq!(event.name(), "session_update");
        assert_eq!(event.topic(), "abc");

        let event = SignClientEvent::SessionDelete {
            topic: "def".to_string(),
        };
        assert_eq!(event.name(), "session_delete");
        assert_eq!(event.topic(), "def");
    }
}
