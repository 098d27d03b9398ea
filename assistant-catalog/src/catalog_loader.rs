//! JSON catalog data loader.
//!
//! Scans a directory of `*.json` documents and merges them into one
//! [`Catalog`]. Documents are classified by shape: a document carrying a
//! `products` array contributes products (each stamped with the document's
//! top-level `category`), while `services.json` and `policies.json` are
//! stored verbatim under the matching catalog field. Everything else is
//! ignored.
//!
//! The loader never aborts on a single bad file: unreadable or malformed
//! documents are logged and skipped. A missing directory yields an empty
//! catalog so first-run and misconfigured environments degrade gracefully.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::CatalogError;
use crate::types::Catalog;

/// Category stamped onto products whose document carries no category tag.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Load every `.json` file in `dir` (non-recursive) into a [`Catalog`].
///
/// Filenames are sorted before processing so the merge order is stable
/// across platforms; with unique filenames the services/policies slots are
/// effectively single-write.
pub fn load_catalog(dir: &Path) -> Catalog {
    let mut catalog = Catalog::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::info!(
                "catalog directory {} not readable ({}), starting with an empty catalog",
                dir.display(),
                e
            );
            return catalog;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect();
    names.sort();

    for name in &names {
        let path = dir.join(name);
        let document = match read_document(&path) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        merge_document(&mut catalog, name, document);
    }

    log::info!(
        "loaded catalog: {} products, {} service entries, {} policies from {} files",
        catalog.products.len(),
        catalog.services.len(),
        catalog.policies.len(),
        names.len()
    );

    catalog
}

/// Read and parse one JSON document.
fn read_document(path: &Path) -> Result<Value, CatalogError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Classify a parsed document and merge it into the catalog.
///
/// Classification order matters: a `products` array wins over the filename,
/// so a hypothetical `services.json` with a products array would be treated
/// as a product document.
fn merge_document(catalog: &mut Catalog, file_name: &str, document: Value) {
    let Value::Object(document) = document else {
        log::warn!("skipping {}: top-level value is not an object", file_name);
        return;
    };

    if let Some(Value::Array(products)) = document.get("products") {
        let category = document_category(&document);
        for (index, product) in products.iter().enumerate() {
            let Value::Object(product) = product else {
                log::warn!(
                    "skipping {}[products][{}]: element is not an object",
                    file_name,
                    index
                );
                continue;
            };
            catalog.products.push(stamp_category(product, &category));
        }
        return;
    }

    match file_name {
        "services.json" | "servicios.json" => catalog.services = document,
        "policies.json" | "politicas.json" => catalog.policies = document,
        _ => log::debug!("ignoring {}: no products array and not a named singleton", file_name),
    }
}

/// Read the document-level category tag, falling back to the default.
fn document_category(document: &Map<String, Value>) -> String {
    document
        .get("category")
        .or_else(|| document.get("categoria"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

/// Shallow-copy a raw product and stamp the containing document's category.
fn stamp_category(product: &Map<String, Value>, category: &str) -> Map<String, Value> {
    let mut stamped = product.clone();
    stamped.insert("category".to_string(), Value::String(category.to_string()));
    stamped
}
