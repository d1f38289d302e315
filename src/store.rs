use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::vehicle::VehicleRecord;
use crate::error::CatalogError;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-printed (2-space) UTF-8 JSON. Parent directories are created as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CatalogError> {
    let write_err = |source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    let file = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value).map_err(|source| CatalogError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    out.write_all(b"\n").map_err(write_err)?;
    out.flush().map_err(write_err)?;
    Ok(())
}

/// Load the vendor fitment list: `{"vehicles": [...]}` or a bare array.
/// Entries that are not objects are skipped.
pub fn load_vehicles(path: &Path) -> Result<Vec<VehicleRecord>, CatalogError> {
    let doc: Value = read_json(path)?;
    let shape_err = |reason: &str| CatalogError::Shape {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let entries = match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("vehicles") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(shape_err("`vehicles` is not an array")),
            None => return Err(shape_err("missing `vehicles` field")),
        },
        _ => return Err(shape_err("top level is neither an object nor an array")),
    };

    let total = entries.len();
    let vehicles: Vec<VehicleRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            if !entry.is_object() {
                warn!(record = idx, "Skipping vehicle entry that is not an object");
                return None;
            }
            match serde_json::from_value::<VehicleRecord>(entry) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(record = idx, "Skipping unreadable vehicle entry: {}", e);
                    None
                }
            }
        })
        .collect();

    info!("Loaded {} vehicles from {}", vehicles.len(), path.display());
    if vehicles.len() < total {
        warn!("{} entries were not vehicle objects", total - vehicles.len());
    }
    Ok(vehicles)
}
