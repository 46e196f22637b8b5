use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cached decode of a single VIN. Written once, never recomputed.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vin")]
pub struct Model {
    /// Normalized 17-character VIN.
    #[sea_orm(primary_key, auto_increment = false)]
    pub vin: String,

    pub wmi: String,
    pub vds: String,
    pub vis: String,

    pub model_year: Option<i32>,
    /// Plant code (character 11 of the VIN).
    pub plant: Option<String>,
    /// Plant city reported by the registry.
    pub plant_city: Option<String>,
    /// NULL when the check digit could not be evaluated.
    pub valid_check_digit: Option<bool>,
    pub make: Option<String>,
    pub model: Option<String>,

    #[sea_orm(has_many)]
    pub attributes: HasMany<super::vin_attribute::Entity>,

    #[sea_orm(has_many)]
    pub images: HasMany<super::vin_image::Entity>,

    pub decoded_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
