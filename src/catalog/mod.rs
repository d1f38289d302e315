pub mod battery;
pub mod codec;
pub mod group;
pub mod motorisation;
pub mod names;
pub mod vehicle;

use tracing::info;

use group::Product;
use vehicle::VehicleRecord;

pub struct TransformStats {
    pub records: usize,
    pub skipped: usize,
    pub raw_groups: usize,
    pub preliminary_products: usize,
    pub preliminary_motorisations: usize,
    pub products: usize,
    pub motorisations: usize,
    pub without_batteries: usize,
}

impl TransformStats {
    pub fn print(&self) {
        println!(
            "Read {} vehicles ({} skipped without make/model) into {} brand+model groups.",
            self.records, self.skipped, self.raw_groups
        );
        println!(
            "Transformed {} products ({} motorisations), merged into {} products ({} motorisations).",
            self.preliminary_products,
            self.preliminary_motorisations,
            self.products,
            self.motorisations
        );
        if self.without_batteries > 0 {
            println!("{} motorisations have no battery option.", self.without_batteries);
        }
    }
}

pub struct Catalog {
    pub products: Vec<Product>,
    pub stats: TransformStats,
}

/// Vehicles → grouped → normalized/deduplicated → merged battery products.
pub fn build_products(vehicles: &[VehicleRecord]) -> Catalog {
    let groups = group::group_by_raw_model(vehicles);
    info!(
        "Grouped {} vehicles into {} brand+model combinations",
        vehicles.len(),
        groups.buckets.len()
    );

    let preliminary = group::build_preliminary(&groups.buckets);
    let preliminary_products = preliminary.len();
    let preliminary_motorisations = count_motorisations(&preliminary);
    info!(
        "Transformed {} products ({} motorisations)",
        preliminary_products, preliminary_motorisations
    );

    let products = group::merge_by_clean_model(preliminary);
    let motorisations = count_motorisations(&products);
    info!("Merged into {} products ({} motorisations)", products.len(), motorisations);

    let without_batteries = products
        .iter()
        .flat_map(|p| &p.motorisations)
        .filter(|m| !m.has_batteries())
        .count();

    let stats = TransformStats {
        records: vehicles.len(),
        skipped: groups.skipped,
        raw_groups: groups.buckets.len(),
        preliminary_products,
        preliminary_motorisations,
        products: products.len(),
        motorisations,
        without_batteries,
    };
    Catalog { products, stats }
}

fn count_motorisations(products: &[Product]) -> usize {
    products.iter().map(|p| p.motorisations.len()).sum()
}

// ── Tests ──
