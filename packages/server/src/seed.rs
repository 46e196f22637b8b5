use chrono::Utc;
use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{vin as vin_record, vin_attribute, vin_image};
use crate::services::ServiceError;
use crate::services::vin_cache::VinCacheService;

/// VIN seeded on startup so the image endpoints have something to serve.
pub const SAMPLE_VIN: &str = "1M8GDM9AXKP042788";

/// A 1x1 grayscale PNG.
pub const SAMPLE_PNG: &[u8] = &[
    137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82, 0, 0, 0, 1, 0, 0, 0, 1, 8, 4, 0,
    0, 0, 181, 28, 12, 2, 0, 0, 0, 11, 73, 68, 65, 84, 120, 156, 99, 96, 96, 0, 0, 0, 3, 0, 1, 104,
    38, 89, 13, 0, 0, 0, 0, 73, 69, 78, 68, 174, 66, 96, 130,
];

/// Cache the sample VIN from its structural decode and attach the sample image.
///
/// Idempotent: the image is only added while the VIN has none.
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let record = VinCacheService::new(db, None)
        .ensure_cached(SAMPLE_VIN)
        .await?;

    let images = vin_image::Entity::find()
        .filter(vin_image::Column::Vin.eq(&record.vin))
        .count(db)
        .await?;
    if images > 0 {
        return Ok(());
    }

    vin_image::ActiveModel {
        vin: Set(record.vin.clone()),
        content_type: Set("image/png".to_string()),
        data: Set(SAMPLE_PNG.to_vec()),
        size: Set(SAMPLE_PNG.len() as i64),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(vin = %record.vin, "Seeded sample VIN image");
    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Newest image of a VIN
    create_index(
        db,
        "idx_vin_image_vin_created",
        Index::create()
            .table(vin_image::Entity)
            .col(vin_image::Column::Vin)
            .col(vin_image::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    // Attributes of a VIN in registry order
    create_index(
        db,
        "idx_vin_attribute_vin_position",
        Index::create()
            .table(vin_attribute::Entity)
            .col(vin_attribute::Column::Vin)
            .col(vin_attribute::Column::Position)
            .to_owned(),
    )
    .await;

    create_index(
        db,
        "idx_vin_make_model",
        Index::create()
            .table(vin_record::Entity)
            .col(vin_record::Column::Make)
            .col(vin_record::Column::Model)
            .to_owned(),
    )
    .await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, mut stmt: IndexCreateStatement) {
    let sql = stmt.if_not_exists().name(name).to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}
