mod catalog;
mod error;
mod fetch;
mod reconcile;
mod settings;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde_json::Value;

use fetch::{CollectionDump, FetchOptions};
use settings::Settings;

const VEHICLES_FILE: &str = "liste_affectation/exide-vehicles.json";
const VEHICLES_BY_BRAND_FILE: &str = "liste_affectation/exide-vehicles-by-brand.json";

#[derive(Parser)]
#[command(name = "exide_catalog", about = "Exide battery catalog reconciliation against the CMS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build battery products from the vendor vehicle list
    Transform {
        /// Vendor vehicle list ({"vehicles": [...]})
        #[arg(short, long, default_value = VEHICLES_FILE)]
        input: PathBuf,
        /// Output file (default: <data_dir>/exide-battery-products.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Regroup the vendor vehicle list as brand -> cleaned model names
    ByBrand {
        #[arg(short, long, default_value = VEHICLES_FILE)]
        input: PathBuf,
        #[arg(short, long, default_value = VEHICLES_BY_BRAND_FILE)]
        output: PathBuf,
    },
    /// Extract the sorted vendor brand list from the by-brand file
    Brands {
        #[arg(short, long, default_value = VEHICLES_BY_BRAND_FILE)]
        input: PathBuf,
        /// Output file (default: <data_dir>/exide-brands.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download every page of a CMS collection (e.g. brands, models)
    Fetch {
        collection: String,
        /// Keep only items without a brand relation
        #[arg(long)]
        without_brand: bool,
        /// Output file (default: <data_dir>/<collection>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Vendor brands that the CMS does not have yet
    MissingBrands {
        /// Fetched CMS brands (default: <data_dir>/brands.json)
        #[arg(long)]
        api: Option<PathBuf>,
        /// Vendor brand list (default: <data_dir>/exide-brands.json)
        #[arg(long)]
        vendor: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Union of CMS and vendor brands with overlap counts
    MergeBrands {
        /// Fetched CMS brands (default: <data_dir>/brands.json)
        #[arg(long)]
        api: Option<PathBuf>,
        /// Vendor brand list (default: <data_dir>/exide-brands.json)
        #[arg(long)]
        vendor: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Vendor models, per brand, that the CMS does not have yet
    MissingModels {
        #[arg(long, default_value = VEHICLES_BY_BRAND_FILE)]
        vendor: PathBuf,
        /// Fetched CMS models (default: <data_dir>/models.json)
        #[arg(long)]
        api: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load STRAPI_* settings")?;

    let result = match cli.command {
        Commands::Transform { input, output } => {
            let output = output.unwrap_or_else(|| settings.data_file("exide-battery-products.json"));
            run_transform(&input, &output)
        }
        Commands::ByBrand { input, output } => {
            let vehicles = store::load_vehicles(&input)?;
            let by_brand = reconcile::models_by_brand(&vehicles);
            let models: usize = by_brand.values().map(|m| m.len()).sum();
            store::write_json(&output, &by_brand)?;
            println!(
                "Organized {} vehicles into {} brands ({} unique models) -> {}",
                vehicles.len(),
                by_brand.len(),
                models,
                output.display()
            );
            Ok(())
        }
        Commands::Brands { input, output } => {
            let output = output.unwrap_or_else(|| settings.data_file("exide-brands.json"));
            let by_brand: IndexMap<String, Value> = store::read_json(&input)?;
            let source = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let list = reconcile::vendor_brand_list(&by_brand, &source);
            store::write_json(&output, &list)?;
            println!("Extracted {} brands -> {}", list.meta.total, output.display());
            print_sample("First brands", &list.data, 10);
            Ok(())
        }
        Commands::Fetch { collection, without_brand, output } => {
            run_fetch(&settings, &collection, without_brand, output).await
        }
        Commands::MissingBrands { api, vendor, output } => {
            let api = api.unwrap_or_else(|| settings.data_file("brands.json"));
            let vendor = vendor.unwrap_or_else(|| settings.data_file("exide-brands.json"));
            let output = output.unwrap_or_else(|| settings.data_file("missing-brands.json"));

            let api_doc: CollectionDump = store::read_json(&api)?;
            let vendor_doc: CollectionDump = store::read_json(&vendor)?;
            let missing = reconcile::missing_brands(&api_doc.data, &vendor_doc.data);
            store::write_json(&output, &missing)?;

            println!("Brands in Strapi database: {}", missing.meta.total_in_strapi);
            println!("Brands in Exide data:      {}", missing.meta.total_in_exide);
            println!("Missing from Strapi:       {} -> {}", missing.meta.total, output.display());
            print_sample("Missing brands", &missing.data, 20);
            Ok(())
        }
        Commands::MergeBrands { api, vendor, output } => {
            let api = api.unwrap_or_else(|| settings.data_file("brands.json"));
            let vendor = vendor.unwrap_or_else(|| settings.data_file("exide-brands.json"));
            let output = output.unwrap_or_else(|| settings.data_file("all-brands-unique.json"));

            let api_doc: CollectionDump = store::read_json(&api)?;
            let vendor_doc: CollectionDump = store::read_json(&vendor)?;
            let merged = reconcile::merge_brands(&api_doc.data, &vendor_doc.data);
            store::write_json(&output, &merged)?;

            println!("Brands from API:   {}", merged.meta.from_api);
            println!("Brands from Exide: {}", merged.meta.from_exide);
            println!(
                "Common: {}, only in API: {}, only in Exide: {}",
                merged.meta.common, merged.meta.only_in_api, merged.meta.only_in_exide
            );
            println!("Total unique brands: {} -> {}", merged.meta.total, output.display());
            print_sample("First brands", &merged.data, 10);
            Ok(())
        }
        Commands::MissingModels { vendor, api, output } => {
            let api = api.unwrap_or_else(|| settings.data_file("models.json"));
            let output = output.unwrap_or_else(|| settings.data_file("missing-models-by-brand.json"));

            let vendor_doc: IndexMap<String, Value> = store::read_json(&vendor)?;
            let api_doc: CollectionDump = store::read_json(&api)?;
            let known = reconcile::KnownModels::from_items(&api_doc.data);
            let (names, slugs) = known.counts();
            println!("Strapi models: {} names, {} slugs", names, slugs);

            let missing = reconcile::missing_models(&vendor_doc, &known);
            store::write_json(&output, &missing)?;
            let total: usize = missing.values().map(|m| m.len()).sum();
            println!(
                "Found {} missing models across {} brands -> {}",
                total,
                missing.len(),
                output.display()
            );
            for (brand, models) in missing.iter().take(10) {
                let examples = models.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
                println!("  {}: {} missing (e.g. {})", brand, models.len(), examples);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_transform(input: &Path, output: &Path) -> anyhow::Result<()> {
    let vehicles = store::load_vehicles(input)?;
    println!("Found {} vehicles to process", vehicles.len());

    let catalog = catalog::build_products(&vehicles);
    store::write_json(output, &catalog.products)?;
    catalog.stats.print();
    println!("Saved {} battery products -> {}", catalog.products.len(), output.display());

    if let Some(first) = catalog.products.first() {
        println!("\nFirst product example:");
        println!("  Brand: {} ({})", first.brand, first.brand_slug);
        println!("  Model: {} ({})", first.model, first.model_slug);
        println!("  Motorisations: {}", first.motorisations.len());
    }
    Ok(())
}

async fn run_fetch(
    settings: &Settings,
    collection: &str,
    without_brand: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let opts = FetchOptions {
        collection,
        populate: without_brand.then_some("brand"),
    };
    let default_name = if without_brand {
        format!("{}-without-brand.json", collection)
    } else {
        format!("{}.json", collection)
    };
    let output = output.unwrap_or_else(|| settings.data_file(&default_name));

    println!("Fetching {} from {}...", collection, settings.url);
    let mut items = fetch::fetch_all(settings, &opts).await?;
    if without_brand {
        items.retain(fetch::lacks_brand);
    }

    let mut dump = CollectionDump::new(items);
    if without_brand {
        dump = dump.with_description(&fetch::without_brand_description(collection));
    }
    store::write_json(&output, &dump)?;
    println!("Saved {} {} -> {}", dump.meta.total, collection, output.display());
    Ok(())
}

fn print_sample(title: &str, names: &[String], max: usize) {
    if names.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for (i, name) in names.iter().take(max).enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    if names.len() > max {
        println!("  ... and {} more", names.len() - max);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
