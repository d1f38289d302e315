//! Cross-checks between the vendor catalog and the CMS collections.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::codec::slugify;
use crate::catalog::names::clean_name;
use crate::catalog::vehicle::VehicleRecord;

/// Header words that leak into brand lists from spreadsheet exports.
const HEADER_WORDS: &[&str] = &["marque", "brand"];

/// Brand → sorted unique cleaned model names, brands sorted.
pub type ModelsByBrand = BTreeMap<String, BTreeSet<String>>;

pub fn models_by_brand(vehicles: &[VehicleRecord]) -> ModelsByBrand {
    let mut by_brand = ModelsByBrand::new();
    for (idx, vehicle) in vehicles.iter().enumerate() {
        let Some(brand) = vehicle.brand() else {
            debug!(record = idx, "Skipping vehicle without brand");
            continue;
        };
        let models = by_brand.entry(brand.to_string()).or_default();
        if let Some(model) = vehicle.model.as_deref().map(clean_name) {
            if !model.is_empty() {
                models.insert(model);
            }
        }
    }
    by_brand
}

/// A sorted list of names with a small meta block.
#[derive(Debug, Serialize, Deserialize)]
pub struct NameList<M> {
    pub data: Vec<String>,
    pub meta: M,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceMeta {
    pub total: usize,
    pub source: String,
}

/// Brand names of a by-brand document, sorted.
pub fn vendor_brand_list(by_brand: &IndexMap<String, Value>, source: &str) -> NameList<SourceMeta> {
    let mut data: Vec<String> = by_brand.keys().cloned().collect();
    data.sort();
    let total = data.len();
    NameList {
        data,
        meta: SourceMeta {
            total,
            source: source.to_string(),
        },
    }
}

/// Trim, drop a BOM, and reject blanks and spreadsheet header words.
pub fn clean_brand_name(name: &str) -> Option<String> {
    let cleaned = name.trim().replace('\u{feff}', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || HEADER_WORDS.contains(&cleaned.to_lowercase().as_str()) {
        return None;
    }
    Some(cleaned.to_string())
}

/// Brand names from a collection's `data`: objects with `name`, or bare strings.
pub fn brand_names(items: &[Value]) -> BTreeSet<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str),
            _ => None,
        })
        .filter_map(clean_brand_name)
        .collect()
}

/// Vendor brand lists are plain strings; anything else is ignored.
fn vendor_brand_names(items: &[Value]) -> BTreeSet<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .filter_map(clean_brand_name)
        .collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MissingBrandsMeta {
    pub total: usize,
    pub total_in_strapi: usize,
    pub total_in_exide: usize,
    pub description: String,
}

/// Vendor brands absent from the CMS, sorted.
pub fn missing_brands(api_items: &[Value], vendor_items: &[Value]) -> NameList<MissingBrandsMeta> {
    let api = brand_names(api_items);
    let vendor = vendor_brand_names(vendor_items);

    let data: Vec<String> = vendor.difference(&api).cloned().collect();
    NameList {
        meta: MissingBrandsMeta {
            total: data.len(),
            total_in_strapi: api.len(),
            total_in_exide: vendor.len(),
            description: "Brands that exist in Exide data but are missing from Strapi database"
                .to_string(),
        },
        data,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MergedBrandsMeta {
    pub total: usize,
    pub from_api: usize,
    pub from_exide: usize,
    pub common: usize,
    pub only_in_api: usize,
    pub only_in_exide: usize,
}

/// Every brand known to either side, sorted, with overlap counts.
pub fn merge_brands(api_items: &[Value], vendor_items: &[Value]) -> NameList<MergedBrandsMeta> {
    let api = brand_names(api_items);
    let vendor = vendor_brand_names(vendor_items);

    let data: Vec<String> = api.union(&vendor).cloned().collect();
    NameList {
        meta: MergedBrandsMeta {
            total: data.len(),
            from_api: api.len(),
            from_exide: vendor.len(),
            common: api.intersection(&vendor).count(),
            only_in_api: api.difference(&vendor).count(),
            only_in_exide: vendor.difference(&api).count(),
        },
        data,
    }
}

/// Model names and lowercased slugs known to the CMS.
#[derive(Debug, Default)]
pub struct KnownModels {
    names: HashSet<String>,
    slugs: HashSet<String>,
}

impl KnownModels {
    pub fn from_items(items: &[Value]) -> Self {
        let mut known = KnownModels::default();
        for obj in items.iter().filter_map(Value::as_object) {
            if let Some(name) = obj.get("name").and_then(Value::as_str).map(str::trim) {
                if !name.is_empty() {
                    known.names.insert(name.to_string());
                }
            }
            if let Some(slug) = obj.get("slug").and_then(Value::as_str) {
                if !slug.is_empty() {
                    known.slugs.insert(slug.to_lowercase());
                }
            }
        }
        known
    }

    /// Matched by exact name, or by slug so that spelling variants still line up.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name) || self.slugs.contains(&slugify(name))
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.names.len(), self.slugs.len())
    }
}

/// Vendor models not known to the CMS, per brand in vendor order.
/// Brands with nothing missing are left out.
pub fn missing_models(
    vendor: &IndexMap<String, Value>,
    known: &KnownModels,
) -> IndexMap<String, Vec<String>> {
    let mut missing = IndexMap::new();
    for (brand, models) in vendor {
        let Some(models) = models.as_array() else {
            continue;
        };
        let absent: Vec<String> = models
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty() && !known.contains(name))
            .map(str::to_string)
            .collect();
        if !absent.is_empty() {
            missing.insert(brand.clone(), absent);
        }
    }
    missing
}
