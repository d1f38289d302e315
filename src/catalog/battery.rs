use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Battery product lines carried by the vendor catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryFamily {
    Agm,
    Efb,
    Premium,
    Excell,
    Classic,
}

impl BatteryFamily {
    pub const ALL: [BatteryFamily; 5] = [
        BatteryFamily::Agm,
        BatteryFamily::Efb,
        BatteryFamily::Premium,
        BatteryFamily::Excell,
        BatteryFamily::Classic,
    ];

    /// Key under `batteries` in a vehicle record.
    pub fn key(self) -> &'static str {
        match self {
            BatteryFamily::Agm => "agm",
            BatteryFamily::Efb => "efb",
            BatteryFamily::Premium => "premium",
            BatteryFamily::Excell => "excell",
            BatteryFamily::Classic => "classic",
        }
    }
}

/// Three option codes for one family. Empty string means "no option".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryOptions {
    pub option1: String,
    pub option2: String,
    pub option3: String,
}

impl BatteryOptions {
    #[cfg(test)]
    pub fn new(option1: &str, option2: &str, option3: &str) -> Self {
        BatteryOptions {
            option1: option1.to_string(),
            option2: option2.to_string(),
            option3: option3.to_string(),
        }
    }

    /// Read a family sub-record. Missing or non-object input yields all-empty slots.
    pub fn extract(raw: Option<&Value>) -> Self {
        let Some(obj) = raw.and_then(Value::as_object) else {
            return BatteryOptions::default();
        };
        let slot = |name: &str| obj.get(name).map(truthy_text).unwrap_or_default();
        BatteryOptions {
            option1: slot("option1"),
            option2: slot("option2"),
            option3: slot("option3"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.option1.is_empty() && self.option2.is_empty() && self.option3.is_empty()
    }
}

fn truthy_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => String::new(),
    }
}

/// One `BatteryOptions` per family, serialized under the product field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatterySet {
    #[serde(rename = "batteryAGM")]
    pub agm: BatteryOptions,
    #[serde(rename = "batteryEFB")]
    pub efb: BatteryOptions,
    #[serde(rename = "batteryPremium")]
    pub premium: BatteryOptions,
    #[serde(rename = "batteryExcell")]
    pub excell: BatteryOptions,
    #[serde(rename = "batteryClassic")]
    pub classic: BatteryOptions,
}

impl BatterySet {
    /// Unknown family keys are ignored.
    pub fn from_families(batteries: &Map<String, Value>) -> Self {
        let pick = |family: BatteryFamily| BatteryOptions::extract(batteries.get(family.key()));
        BatterySet {
            agm: pick(BatteryFamily::Agm),
            efb: pick(BatteryFamily::Efb),
            premium: pick(BatteryFamily::Premium),
            excell: pick(BatteryFamily::Excell),
            classic: pick(BatteryFamily::Classic),
        }
    }

    pub fn get(&self, family: BatteryFamily) -> &BatteryOptions {
        match family {
            BatteryFamily::Agm => &self.agm,
            BatteryFamily::Efb => &self.efb,
            BatteryFamily::Premium => &self.premium,
            BatteryFamily::Excell => &self.excell,
            BatteryFamily::Classic => &self.classic,
        }
    }

    /// Families with at least one option code.
    pub fn populated(&self) -> impl Iterator<Item = BatteryFamily> + '_ {
        BatteryFamily::ALL
            .into_iter()
            .filter(|family| !self.get(*family).is_empty())
    }
}
