pub mod image_store;
pub mod vin_cache;

use common::VinError;
use sea_orm::DbErr;

use crate::registry::RegistryError;

/// Failures of the VIN cache and image store.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidVin(#[from] VinError),
    #[error("vehicle registry unavailable: {0}")]
    RegistryUnavailable(#[from] RegistryError),
    #[error("image payload is empty")]
    EmptyPayload,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}
