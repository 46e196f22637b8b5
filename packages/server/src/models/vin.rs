use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::vin_attribute;
use crate::services::vin_cache::VinLookup;

/// One attribute exactly as the registry reported it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VinAttributeResponse {
    #[schema(example = "Make")]
    pub variable: String,
    #[schema(example = "MOTOR COACH INDUSTRIES")]
    pub value: Option<String>,
    #[schema(example = 26)]
    pub variable_id: i32,
    #[schema(example = "1014")]
    pub value_id: Option<String>,
}

impl From<vin_attribute::Model> for VinAttributeResponse {
    fn from(model: vin_attribute::Model) -> Self {
        Self {
            variable: model.variable,
            value: model.value,
            variable_id: model.variable_id,
            value_id: model.value_id,
        }
    }
}

/// Cached VIN record with its registry attributes.
///
/// Unknown values are omitted rather than sent as `null`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VinResponse {
    #[schema(example = "1M8GDM9AXKP042788")]
    pub vin: String,
    #[schema(example = "1M8")]
    pub wmi: String,
    #[schema(example = "GDM9AX")]
    pub vds: String,
    #[schema(example = "KP042788")]
    pub vis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 2019)]
    pub model_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "P")]
    pub plant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_city: Option<String>,
    /// Absent when the VIN contains a character without a transliteration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_check_digit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub decoded_at: DateTime<Utc>,
    /// Registry attributes in the order the registry returned them.
    pub attributes: Vec<VinAttributeResponse>,
}

impl From<VinLookup> for VinResponse {
    fn from(lookup: VinLookup) -> Self {
        let record = lookup.record;
        Self {
            vin: record.vin,
            wmi: record.wmi,
            vds: record.vds,
            vis: record.vis,
            model_year: record.model_year,
            plant: record.plant,
            plant_city: record.plant_city,
            valid_check_digit: record.valid_check_digit,
            make: record.make,
            model: record.model,
            decoded_at: record.decoded_at,
            attributes: lookup
                .attributes
                .into_iter()
                .map(VinAttributeResponse::from)
                .collect(),
        }
    }
}
