use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{RegistryAttribute, RegistryConfig, RegistryResponse};
use reqwest::{Client, Url};
use tracing::{debug, instrument, warn};

use super::{RegistryError, VehicleRegistry};

/// Upper bound on how much of an error body is kept for diagnostics.
const MAX_ERROR_BODY: usize = 2048;

/// `VehicleRegistry` backed by the NHTSA vPIC `decodevin` endpoint.
pub struct NhtsaRegistry {
    client: Client,
    base_url: Url,
}

impl NhtsaRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RegistryError::Config(format!("base_url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RegistryError::Config(format!(
                "base_url '{base_url}' cannot carry a path"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RegistryError::Transport)?;

        Ok(Self { client, base_url })
    }

    /// `{base_url}/decodevin/{vin}?format=json`, with the VIN percent-encoded.
    fn decode_url(&self, vin: &str) -> Result<Url, RegistryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RegistryError::Config("base_url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["decodevin", vin]);
        url.query_pairs_mut().append_pair("format", "json");
        Ok(url)
    }
}

#[async_trait]
impl VehicleRegistry for NhtsaRegistry {
    #[instrument(skip(self))]
    async fn decode(&self, vin: &str) -> Result<Vec<RegistryAttribute>, RegistryError> {
        let url = self.decode_url(vin)?;
        let started = Instant::now();

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            warn!(status = status.as_u16(), "Registry rejected decode request");
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: RegistryResponse =
            serde_json::from_slice(&bytes).map_err(|e| RegistryError::Decode(e.to_string()))?;

        debug!(
            attributes = parsed.results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            message = parsed.message.as_deref().unwrap_or_default(),
            "Registry decode finished"
        );

        Ok(parsed.results)
    }
}
