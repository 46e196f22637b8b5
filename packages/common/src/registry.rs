use serde::{Deserialize, Serialize};

pub const MAKE_VARIABLE: &str = "Make";
pub const MODEL_VARIABLE: &str = "Model";
pub const MODEL_YEAR_VARIABLE: &str = "Model Year";
pub const PLANT_CITY_VARIABLE: &str = "Plant City";

/// One decoded attribute as returned by the vehicle registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegistryAttribute {
    #[serde(rename = "Variable")]
    #[schema(example = "Make")]
    pub variable: String,
    #[serde(rename = "Value", default)]
    #[schema(example = "HONDA")]
    pub value: Option<String>,
    #[serde(rename = "VariableId")]
    #[schema(example = 26)]
    pub variable_id: i32,
    #[serde(rename = "ValueId", default)]
    #[schema(example = "474")]
    pub value_id: Option<String>,
}

/// Envelope of the registry's `decodevin` response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegistryResponse {
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Results", default)]
    pub results: Vec<RegistryAttribute>,
}

/// Headline fields pulled out of a registry attribute list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub make: Option<String>,
    pub model: Option<String>,
    pub model_year: Option<i32>,
    pub plant_city: Option<String>,
}

impl EnrichmentSummary {
    /// Take the first attribute matching each variable name exactly.
    ///
    /// Empty values count as absent. The model year is taken from the first
    /// `Model Year` attribute whose value is purely ASCII digits.
    pub fn from_attributes(attributes: &[RegistryAttribute]) -> Self {
        let model_year = attributes
            .iter()
            .filter(|a| a.variable == MODEL_YEAR_VARIABLE)
            .filter_map(|a| a.value.as_deref())
            .find(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|v| v.parse().ok());

        Self {
            make: first_value(attributes, MAKE_VARIABLE),
            model: first_value(attributes, MODEL_VARIABLE),
            model_year,
            plant_city: first_value(attributes, PLANT_CITY_VARIABLE),
        }
    }
}

fn first_value(attributes: &[RegistryAttribute], variable: &str) -> Option<String> {
    attributes
        .iter()
        .find(|a| a.variable == variable)
        .and_then(|a| a.value.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
