use std::fmt::{self, Display};

use crate::types::JsonRpcError;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    NotInitialized,
    SessionNotConnected,
    NoDefaultMethods(String),
    NoDefaultEvents(String),
    NoMetadataHandler(String),
    NoChainMetadata(String),
    NoRenderHandler(String),
    InvalidRelayUrl(String),
    JsonRpc(JsonRpcError),
    /// Lets `SignClient` implementations bubble up SDK errors with `?`
    Anyhow(anyhow::Error),
    InternalError(String),
    SerdeJsonError(serde_json::Error),
    SerdePlainError(serde_plain::Error),
    UrlParseError(url::ParseError),
    QrError(qrcode::types::QrError),
    IoError(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => {
                write!(f, "WalletConnect is not initialized")
            }
            Self::SessionNotConnected => write!(f, "Session is not connected"),
            Self::NoDefaultMethods(ns) => {
                write!(f, "No default methods for namespace: {ns}")
            }
            Self::NoDefaultEvents(ns) => {
                write!(f, "No default events for namespace: {ns}")
            }
            Self::NoMetadataHandler(ns) => {
                write!(f, "No metadata handler for namespace {ns}")
            }
            Self::NoChainMetadata(chain_id) => {
                write!(f, "No chain metadata found for chainId: {chain_id}")
            }
            Self::NoRenderHandler(ns) => {
                write!(f, "No render handler for namespace {ns}")
            }
            Self::InvalidRelayUrl(url) => write!(f, "Invalid relay url: {url}"),
            Self::JsonRpc(e) => write!(f, "{}", e.message),
            Self::Anyhow(e) => write!(f, "{e}"),
            Self::InternalError(e) => write!(f, "{e}"),
            Self::SerdeJsonError(e) => write!(f, "{e}"),
            Self::SerdePlainError(e) => write!(f, "{e}"),
            Self::UrlParseError(e) => write!(f, "{e}"),
            Self::QrError(e) => write!(f, "Failed to generate QR code: {e}"),
            Self::IoError(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::InternalError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::InternalError(e)
    }
}

impl From<JsonRpcError> for Error {
    fn from(e: JsonRpcError) -> Self {
        Error::JsonRpc(e)
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Anyhow(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerdeJsonError(e)
    }
}

impl From<serde_plain::Error> for Error {
    fn from(e: serde_plain::Error) -> Self {
        Error::SerdePlainError(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::UrlParseError(e)
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::QrError(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wallet_facing_text() {
        assert_eq!(
            Error::NotInitialized.to_string(),
            "WalletConnect is not initialized"
        );
        assert_eq!(
            Error::SessionNotConnected.to_string(),
            "Session is not connected"
        );
        assert_eq!(
            Error::NoDefaultMethods("eip155".to_string()).to_string(),
            "No default methods for namespace: eip155"
        );
        assert_eq!(Error::from("boom").to_string(), "boom");
    }

    #[test]
    fn test_sdk_errors_convert_with_question_mark() {
        fn init() -> Result<()> {
            Err::<(), _>(anyhow::anyhow!("relay closed the socket"))?;
            Ok(())
        }

        let err = init().unwrap_err();
        assert!(matches!(err, Error::Anyhow(_)));
        assert_eq!(err.to_string(), "relay closed the socket");
    }
}
