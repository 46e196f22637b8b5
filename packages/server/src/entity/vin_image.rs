use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vin_image")]
pub struct Model {
    /// Monotonic serial ID.
    #[sea_orm(primary_key)]
    pub id: i32,

    pub vin: String,
    #[sea_orm(belongs_to, from = "vin", to = "vin")]
    pub vin_record: HasOne<super::vin::Entity>,

    pub content_type: String,
    pub data: Vec<u8>,
    /// Byte length of `data`.
    pub size: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
