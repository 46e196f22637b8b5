use serde::Deserialize;

/// Vehicle registry (NHTSA vPIC) client configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct RegistryConfig {
    /// Whether cache misses are enriched from the registry. Default: true.
    /// When disabled, records are built from the structural decode alone.
    #[serde(default = "default_registry_enabled")]
    pub enabled: bool,
    /// Base URL of the vehicles API. Default: "https://vpic.nhtsa.dot.gov/api/vehicles".
    #[serde(default = "default_registry_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Default: 10.
    #[serde(default = "default_registry_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_registry_enabled() -> bool {
    true
}
fn default_registry_base_url() -> String {
    "https://vpic.nhtsa.dot.gov/api/vehicles".into()
}
fn default_registry_timeout_secs() -> u64 {
    10
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: default_registry_enabled(),
            base_url: default_registry_base_url(),
            timeout_secs: default_registry_timeout_secs(),
        }
    }
}
