use chrono::{DateTime, Utc};
use common::vin::{self, DecodedVin};
use common::{CacheState, EnrichmentSummary, InsertOutcome, RegistryAttribute};
use sea_orm::{TransactionSession, 
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use super::ServiceError;
use crate::entity::{vin as vin_record, vin_attribute, vin_image};
use crate::registry::VehicleRegistry;

/// A cached VIN record together with its registry attributes.
#[derive(Clone, Debug)]
pub struct VinLookup {
    pub record: vin_record::Model,
    /// Ordered as the registry returned them.
    pub attributes: Vec<vin_attribute::Model>,
}

/// Cache-or-enrich decoding of VINs backed by the `vin` table.
///
/// The `vin` primary key is the only guard against concurrent first-time
/// decodes: the losing insert is rolled back and the committed row is
/// returned instead.
pub struct VinCacheService<'a, C: ConnectionTrait + TransactionTrait> {
    conn: &'a C,
    registry: Option<&'a dyn VehicleRegistry>,
}

impl<'a, C: ConnectionTrait + TransactionTrait> VinCacheService<'a, C> {
    /// `registry = None` builds records from the structural decode alone.
    pub fn new(conn: &'a C, registry: Option<&'a dyn VehicleRegistry>) -> Self {
        Self { conn, registry }
    }

    /// Structural decode only; touches neither storage nor the registry.
    pub fn structural(candidate: &str) -> Result<DecodedVin, ServiceError> {
        Ok(vin::decode(candidate)?)
    }

    pub async fn state(&self, vin: &str) -> Result<CacheState<vin_record::Model>, DbErr> {
        let found = vin_record::Entity::find_by_id(vin.to_string())
            .one(self.conn)
            .await?;
        Ok(CacheState::from_lookup(found))
    }

    /// Return the stored record for `candidate` with its attributes,
    /// populating it on first sight.
    ///
    /// Length is validated before storage or the registry are consulted.
    #[instrument(skip(self))]
    pub async fn decode(&self, candidate: &str) -> Result<VinLookup, ServiceError> {
        let record = self.ensure_cached(candidate).await?;
        let attributes = self.attributes(&record.vin).await?;
        Ok(VinLookup { record, attributes })
    }

    /// Make sure a record exists for `candidate` and return it.
    pub async fn ensure_cached(&self, candidate: &str) -> Result<vin_record::Model, ServiceError> {
        let decoded = vin::decode(candidate)?;
        let resolution = self
            .state(&decoded.vin)
            .await?
            .resolve(|| self.populate(&decoded))
            .await?;

        if resolution.is_hit() {
            debug!(vin = %decoded.vin, "VIN served from cache");
        }
        Ok(resolution.into_record())
    }

    /// Stored attributes of a VIN in registry order.
    pub async fn attributes(&self, vin: &str) -> Result<Vec<vin_attribute::Model>, DbErr> {
        vin_attribute::Entity::find()
            .filter(vin_attribute::Column::Vin.eq(vin))
            .order_by_asc(vin_attribute::Column::Position)
            .all(self.conn)
            .await
    }

    /// Fetch registry attributes (when enabled) and persist a new record.
    async fn populate(
        &self,
        decoded: &DecodedVin,
    ) -> Result<InsertOutcome<vin_record::Model>, ServiceError> {
        let attributes = match self.registry {
            Some(registry) => registry.decode(&decoded.vin).await.inspect_err(|e| {
                warn!(
                    vin = %decoded.vin,
                    upstream_status = ?e.upstream_status(),
                    error = %e,
                    "Registry lookup failed"
                );
            })?,
            None => Vec::new(),
        };

        let summary = EnrichmentSummary::from_attributes(&attributes);
        let outcome = self.insert_record(decoded, &summary, &attributes).await?;

        let record = outcome.record();
        if outcome.was_inserted() {
            info!(
                vin = %record.vin,
                attributes = attributes.len(),
                make = record.make.as_deref().unwrap_or_default(),
                "Cached new VIN"
            );
        } else {
            debug!(vin = %record.vin, "Concurrent decode committed first; using its record");
        }

        Ok(outcome)
    }

    /// Insert the record and its attributes in one transaction.
    ///
    /// A unique violation on `vin` rolls back and reloads the committed row.
    pub async fn insert_record(
        &self,
        decoded: &DecodedVin,
        summary: &EnrichmentSummary,
        attributes: &[RegistryAttribute],
    ) -> Result<InsertOutcome<vin_record::Model>, DbErr> {
        let now = Utc::now();
        let txn = self.conn.begin().await?;

        let record = match build_record(decoded, summary, now).insert(&txn).await {
            Ok(record) => record,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                txn.rollback().await?;
                let existing = vin_record::Entity::find_by_id(decoded.vin.clone())
                    .one(self.conn)
                    .await?
                    .ok_or_else(|| {
                        DbErr::Custom(
                            "UniqueConstraintViolation but existing VIN not found".to_string(),
                        )
                    })?;
                return Ok(InsertOutcome::AlreadyCached(existing));
            }
            Err(e) => return Err(e),
        };

        if !attributes.is_empty() {
            let rows = attributes
                .iter()
                .enumerate()
                .map(|(position, attribute)| vin_attribute::ActiveModel {
                    vin: Set(record.vin.clone()),
                    position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
                    variable: Set(attribute.variable.clone()),
                    value: Set(attribute.value.clone()),
                    variable_id: Set(attribute.variable_id),
                    value_id: Set(attribute.value_id.clone()),
                    created_at: Set(now),
                    ..Default::default()
                });
            vin_attribute::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(InsertOutcome::Inserted(record))
    }

    /// Delete a VIN together with its attributes and images.
    #[instrument(skip(self))]
    pub async fn delete(&self, candidate: &str) -> Result<(), ServiceError> {
        let vin = vin::normalize(candidate);
        let txn = self.conn.begin().await?;

        let exists = vin_record::Entity::find_by_id(vin.clone())
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            return Err(ServiceError::NotFound("VIN not found".into()));
        }

        let images = vin_image::Entity::delete_many()
            .filter(vin_image::Column::Vin.eq(&vin))
            .exec(&txn)
            .await?;
        vin_attribute::Entity::delete_many()
            .filter(vin_attribute::Column::Vin.eq(&vin))
            .exec(&txn)
            .await?;
        vin_record::Entity::delete_by_id(vin.clone())
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!(vin = %vin, images = images.rows_affected, "Deleted VIN");
        Ok(())
    }
}

/// Structural fields are the baseline; registry values win where present.
fn build_record(
    decoded: &DecodedVin,
    summary: &EnrichmentSummary,
    now: DateTime<Utc>,
) -> vin_record::ActiveModel {
    vin_record::ActiveModel {
        vin: Set(decoded.vin.clone()),
        wmi: Set(decoded.wmi.clone()),
        vds: Set(decoded.vds.clone()),
        vis: Set(decoded.vis.clone()),
        model_year: Set(summary.model_year.or(decoded.model_year)),
        plant: Set(Some(decoded.plant.to_string())),
        plant_city: Set(summary.plant_city.clone()),
        valid_check_digit: Set(decoded.valid_check_digit),
        make: Set(summary.make.clone().or_else(|| decoded.make.clone())),
        model: Set(summary.model.clone().or_else(|| decoded.model.clone())),
        decoded_at: Set(now),
    }
}
