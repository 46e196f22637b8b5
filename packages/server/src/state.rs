use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::registry::VehicleRegistry;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    /// `None` when `registry.enabled = false`; new VINs are then cached from
    /// the structural decode alone.
    pub registry: Option<Arc<dyn VehicleRegistry>>,
}

impl AppState {
    pub fn registry(&self) -> Option<&dyn VehicleRegistry> {
        self.registry.as_deref()
    }
}
