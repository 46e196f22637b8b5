use chrono::{DateTime, Utc};
use common::vin;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tracing::{info, instrument};

use super::ServiceError;
use super::vin_cache::VinCacheService;
use crate::entity::{vin as vin_record, vin_image};
use crate::registry::VehicleRegistry;

/// Content type assumed when neither the upload nor the filename tell us.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Image metadata without the payload.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct ImageSummary {
    pub id: i32,
    pub vin: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// Raw image bytes with their content type.
#[derive(Clone, Debug)]
pub struct ImagePayload {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl From<vin_image::Model> for ImagePayload {
    fn from(model: vin_image::Model) -> Self {
        Self {
            content_type: model.content_type,
            data: model.data,
        }
    }
}

/// Pick a content type for an upload.
///
/// A declared type wins unless it is missing or the generic
/// `application/octet-stream`; then the filename extension is consulted,
/// then [`DEFAULT_CONTENT_TYPE`].
pub fn resolve_content_type(declared: Option<&str>, filename: Option<&str>) -> String {
    declared
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .map(str::to_string)
        .or_else(|| {
            filename
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// Images attached to VINs, newest first.
pub struct ImageStore<'a, C: ConnectionTrait + TransactionTrait> {
    conn: &'a C,
    cache: VinCacheService<'a, C>,
}

impl<'a, C: ConnectionTrait + TransactionTrait> ImageStore<'a, C> {
    pub fn new(conn: &'a C, registry: Option<&'a dyn VehicleRegistry>) -> Self {
        Self {
            conn,
            cache: VinCacheService::new(conn, registry),
        }
    }

    /// Attach an image to a VIN, materializing the VIN record first if needed.
    ///
    /// Empty payloads are rejected before anything is read or written.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(
        &self,
        candidate: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<ImageSummary, ServiceError> {
        if data.is_empty() {
            return Err(ServiceError::EmptyPayload);
        }

        let record = self.cache.ensure_cached(candidate).await?;

        let size = i64::try_from(data.len()).unwrap_or(i64::MAX);
        let model = vin_image::ActiveModel {
            vin: Set(record.vin.clone()),
            content_type: Set(content_type.to_string()),
            data: Set(data),
            size: Set(size),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        info!(vin = %model.vin, image_id = model.id, "Stored VIN image");

        Ok(ImageSummary {
            id: model.id,
            vin: model.vin,
            content_type: model.content_type,
            size: model.size,
            created_at: model.created_at,
        })
    }

    /// Most recently created image of a VIN.
    pub async fn latest(&self, candidate: &str) -> Result<ImagePayload, ServiceError> {
        let vin = vin::normalize(candidate);
        newest_first(vin_image::Entity::find().filter(vin_image::Column::Vin.eq(&vin)))
            .one(self.conn)
            .await?
            .map(ImagePayload::from)
            .ok_or_else(|| ServiceError::NotFound("Image not found".into()))
    }

    /// Image `id`, only if it belongs to the VIN.
    pub async fn get(&self, candidate: &str, id: i32) -> Result<ImagePayload, ServiceError> {
        let vin = vin::normalize(candidate);
        vin_image::Entity::find_by_id(id)
            .filter(vin_image::Column::Vin.eq(&vin))
            .one(self.conn)
            .await?
            .map(ImagePayload::from)
            .ok_or_else(|| ServiceError::NotFound("Image not found".into()))
    }

    /// Metadata of every image of a VIN, newest first.
    pub async fn list(&self, candidate: &str) -> Result<Vec<ImageSummary>, ServiceError> {
        let vin = vin::normalize(candidate);
        let images = summaries(vin_image::Entity::find().filter(vin_image::Column::Vin.eq(&vin)))
            .all(self.conn)
            .await?;

        if images.is_empty() {
            return Err(ServiceError::NotFound(
                "No images found for this VIN".into(),
            ));
        }
        Ok(images)
    }

    /// Images of every cached VIN with this make and model (case-insensitive).
    #[instrument(skip(self))]
    pub async fn find_by_make_model(
        &self,
        make: &str,
        model: &str,
    ) -> Result<Vec<ImageSummary>, ServiceError> {
        let vins: Vec<String> = vin_record::Entity::find()
            .select_only()
            .column(vin_record::Column::Vin)
            .filter(
                Expr::expr(Func::lower(Expr::col(vin_record::Column::Make)))
                    .eq(make.trim().to_lowercase()),
            )
            .filter(
                Expr::expr(Func::lower(Expr::col(vin_record::Column::Model)))
                    .eq(model.trim().to_lowercase()),
            )
            .into_tuple()
            .all(self.conn)
            .await?;

        let images = if vins.is_empty() {
            Vec::new()
        } else {
            summaries(vin_image::Entity::find().filter(vin_image::Column::Vin.is_in(vins)))
                .all(self.conn)
                .await?
        };

        if images.is_empty() {
            return Err(ServiceError::NotFound(
                "No images found for this make and model".into(),
            ));
        }
        Ok(images)
    }
}

fn newest_first(select: Select<vin_image::Entity>) -> Select<vin_image::Entity> {
    select
        .order_by_desc(vin_image::Column::CreatedAt)
        .order_by_desc(vin_image::Column::Id)
}

fn summaries(
    select: Select<vin_image::Entity>,
) -> sea_orm::Selector<sea_orm::SelectModel<ImageSummary>> {
    newest_first(select)
        .select_only()
        .columns([
            vin_image::Column::Id,
            vin_image::Column::Vin,
            vin_image::Column::ContentType,
            vin_image::Column::Size,
            vin_image::Column::CreatedAt,
        ])
        .into_model::<ImageSummary>()
}
