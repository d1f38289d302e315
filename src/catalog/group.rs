use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codec::slugify;
use super::motorisation::{dedup_motorisations, Motorisation};
use super::names::clean_name;
use super::vehicle::VehicleRecord;

/// Bucket key. Model is raw in the first pass, cleaned in the merge pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub brand: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub brand: String,
    pub brand_slug: String,
    pub model: String,
    pub model_slug: String,
    pub motorisations: Vec<Motorisation>,
}

impl Product {
    pub fn new(brand: &str, model: &str, motorisations: Vec<Motorisation>) -> Self {
        Product {
            brand: brand.to_string(),
            brand_slug: slugify(brand),
            model: model.to_string(),
            model_slug: slugify(model),
            motorisations,
        }
    }

    fn rename_model(&mut self, model: &str) {
        self.model = model.to_string();
        self.model_slug = slugify(model);
    }
}

/// Records bucketed by (brand, raw model), in first-seen order.
pub struct RawGroups<'a> {
    pub buckets: IndexMap<GroupKey, Vec<&'a VehicleRecord>>,
    pub skipped: usize,
}

/// First pass. Records without a brand or model are left out and counted.
pub fn group_by_raw_model(records: &[VehicleRecord]) -> RawGroups<'_> {
    let mut buckets: IndexMap<GroupKey, Vec<&VehicleRecord>> = IndexMap::new();
    let mut skipped = 0;

    for (idx, record) in records.iter().enumerate() {
        let Some((brand, model)) = record.identity() else {
            debug!(record = idx, "Skipping vehicle without make/model");
            skipped += 1;
            continue;
        };
        let key = GroupKey {
            brand: brand.to_string(),
            model: model.to_string(),
        };
        buckets.entry(key).or_default().push(record);
    }

    RawGroups { buckets, skipped }
}

/// One preliminary product per raw bucket, motorisations normalized and deduplicated.
pub fn build_preliminary(buckets: &IndexMap<GroupKey, Vec<&VehicleRecord>>) -> Vec<Product> {
    buckets
        .iter()
        .map(|(key, records)| {
            let motorisations =
                dedup_motorisations(records.iter().map(|r| Motorisation::from_record(r)));
            Product::new(&key.brand, &key.model, motorisations)
        })
        .collect()
}

/// Second pass: products whose models only differ by a parenthesized
/// annotation collapse into one, named after the cleaned model.
pub fn merge_by_clean_model(products: Vec<Product>) -> Vec<Product> {
    let mut buckets: IndexMap<GroupKey, Vec<Product>> = IndexMap::new();
    for product in products {
        let key = GroupKey {
            brand: product.brand.clone(),
            model: clean_name(&product.model),
        };
        buckets.entry(key).or_default().push(product);
    }

    buckets
        .into_iter()
        .filter_map(|(key, members)| merge_bucket(&key, members))
        .collect()
}

fn merge_bucket(key: &GroupKey, members: Vec<Product>) -> Option<Product> {
    let mut members = members.into_iter();
    let mut base = members.next()?;
    base.rename_model(&key.model);

    let siblings: Vec<Product> = members.collect();
    if !siblings.is_empty() {
        debug!(
            brand = %key.brand,
            model = %key.model,
            merged = siblings.len() + 1,
            "Merging model variants"
        );
        // Dedup across the union: variants distinct within one source may collide here.
        let combined = std::mem::take(&mut base.motorisations)
            .into_iter()
            .chain(siblings.into_iter().flat_map(|p| p.motorisations));
        base.motorisations = dedup_motorisations(combined);
    }
    Some(base)
}
