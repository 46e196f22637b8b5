use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One registry attribute stored verbatim for a VIN.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vin_attribute")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub vin: String,
    #[sea_orm(belongs_to, from = "vin", to = "vin")]
    pub vin_record: HasOne<super::vin::Entity>,

    /// Zero-based index in the registry response.
    pub position: i32,

    pub variable: String,
    #[sea_orm(column_type = "Text")]
    pub value: Option<String>,
    pub variable_id: i32,
    pub value_id: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
