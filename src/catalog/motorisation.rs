use serde::{Deserialize, Serialize};

use super::battery::BatterySet;
use super::codec::convert_date;
use super::names::clean_name;
use super::vehicle::VehicleRecord;

/// One engine/fuel/date-range variant of a model with its battery picks.
///
/// Equality is the derived field-by-field comparison: label, fuel, both
/// dates and all five option triples must match, empty vs populated included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motorisation {
    pub motorisation: String,
    pub fuel: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    #[serde(flatten)]
    pub batteries: BatterySet,
}

impl Motorisation {
    pub fn from_record(record: &VehicleRecord) -> Self {
        let text = |field: &Option<String>| field.as_deref().unwrap_or_default().to_string();
        Motorisation {
            motorisation: clean_name(record.variant.as_deref().unwrap_or_default()),
            fuel: text(&record.fuel_type).trim().to_string(),
            start_date: convert_date(&text(&record.date_from)),
            end_date: convert_date(&text(&record.date_to)),
            batteries: BatterySet::from_families(&record.batteries),
        }
    }

    pub fn has_batteries(&self) -> bool {
        self.batteries.populated().next().is_some()
    }
}

/// Drop candidates equal to one already kept. First occurrence wins and order is preserved.
///
/// Pairwise scan against the accepted list; buckets hold the variants of a
/// single model so they stay small.
pub fn dedup_motorisations<I>(candidates: I) -> Vec<Motorisation>
where
    I: IntoIterator<Item = Motorisation>,
{
    let mut accepted: Vec<Motorisation> = Vec::new();
    for candidate in candidates {
        if !accepted.iter().any(|seen| *seen == candidate) {
            accepted.push(candidate);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::battery::BatteryOptions;
    use serde_json::json;

    fn moto(label: &str, start: &str, end: &str) -> Motorisation {
        Motorisation {
            motorisation: label.to_string(),
            fuel: "Diesel".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            batteries: BatterySet {
                efb: BatteryOptions::new("EL700", "", ""),
                ..Default::default()
            },
        }
    }

    #[test]
    fn from_record_normalizes() {
        let record: VehicleRecord = serde_json::from_value(json!({
            "make": "VOLKSWAGEN",
            "model": "Golf VII",
            "type": " 1.6 TDI (5G1) ",
            "fuelType": " Diesel ",
            "dateFrom": "201208",
            "dateTo": "202013",
            "batteries": { "agm": { "option1": "EK700", "option2": null } }
        }))
        .unwrap();
        let m = Motorisation::from_record(&record);
        assert_eq!(m.motorisation, "1.6 TDI");
        assert_eq!(m.fuel, "Diesel");
        assert_eq!(m.start_date, "2012-08-01");
        assert_eq!(m.end_date, "");
        assert_eq!(m.batteries.agm, BatteryOptions::new("EK700", "", ""));
        assert!(m.batteries.classic.is_empty());
        assert!(m.has_batteries());
    }

    #[test]
    fn from_record_all_missing() {
        let m = Motorisation::from_record(&VehicleRecord::default());
        assert_eq!(m.motorisation, "");
        assert_eq!(m.start_date, "");
        assert_eq!(m.batteries, BatterySet::default());
        assert!(!m.has_batteries());
    }

    #[test]
    fn identical_kept_once() {
        let out = dedup_motorisations(vec![
            moto("1.6 HDi", "2010-01-01", ""),
            moto("1.6 HDi", "2010-01-01", ""),
        ]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn differing_end_date_kept() {
        let out = dedup_motorisations(vec![
            moto("1.6 HDi", "2010-01-01", ""),
            moto("1.6 HDi", "2010-01-01", "2014-06-01"),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_vs_populated_option_differs() {
        let a = moto("1.6 HDi", "2010-01-01", "");
        let mut b = a.clone();
        b.batteries.efb.option2 = "EL652".to_string();
        assert_ne!(a, b);
        assert_eq!(dedup_motorisations(vec![a, b]).len(), 2);
    }

    #[test]
    fn first_occurrence_order() {
        let out = dedup_motorisations(vec![
            moto("B", "", ""),
            moto("A", "", ""),
            moto("B", "", ""),
            moto("C", "", ""),
            moto("A", "", ""),
        ]);
        let labels: Vec<&str> = out.iter().map(|m| m.motorisation.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", "C"]);
    }

    #[test]
    fn serializes_flat_battery_fields() {
        let v = serde_json::to_value(moto("1.6 HDi", "2010-01-01", "")).unwrap();
        assert_eq!(v["motorisation"], "1.6 HDi");
        assert_eq!(v["startDate"], "2010-01-01");
        assert_eq!(v["endDate"], "");
        assert_eq!(v["batteryEFB"]["option1"], "EL700");
        assert_eq!(v["batteryAGM"]["option1"], "");
    }
}
