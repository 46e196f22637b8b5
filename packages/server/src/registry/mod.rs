mod nhtsa;

use async_trait::async_trait;
use common::RegistryAttribute;

pub use nhtsa::NhtsaRegistry;

/// Errors raised while talking to the vehicle registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry answered with a non-success status.
    #[error("registry returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// No answer within the configured timeout.
    #[error("registry request timed out")]
    Timeout,
    #[error("registry request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("registry response could not be decoded: {0}")]
    Decode(String),
    #[error("invalid registry configuration: {0}")]
    Config(String),
}

impl RegistryError {
    /// HTTP status reported by the registry, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

/// Authoritative source of decoded vehicle attributes.
///
/// Object-safe; held as `Arc<dyn VehicleRegistry>` in the app state.
#[async_trait]
pub trait VehicleRegistry: Send + Sync {
    /// Fetch every attribute the registry knows for `vin`, in registry order.
    ///
    /// Called at most once per request and never retried.
    async fn decode(&self, vin: &str) -> Result<Vec<RegistryAttribute>, RegistryError>;
}
