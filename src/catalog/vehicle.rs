use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One row of the vendor fitment list.
///
/// Every field is optional on the wire; a value of the wrong JSON type reads
/// as absent rather than failing the whole file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub variant: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fuel_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_from: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_to: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub batteries: Map<String, Value>,
}

impl VehicleRecord {
    /// Trimmed brand, or `None` when missing or blank.
    pub fn brand(&self) -> Option<&str> {
        non_blank(self.make.as_deref())
    }

    /// Trimmed raw model name, or `None` when missing or blank.
    pub fn model_name(&self) -> Option<&str> {
        non_blank(self.model.as_deref())
    }

    /// (brand, model) pair used for grouping. Records without one are dropped.
    pub fn identity(&self) -> Option<(&str, &str)> {
        Some((self.brand()?, self.model_name()?))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}
