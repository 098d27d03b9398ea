use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The in-memory aggregate of all loaded catalog data.
///
/// Rebuilt from scratch on every load; one instance lives for the lifetime
/// of a single assistant session. Products keep their raw JSON shape so the
/// assistant can see every field the data files carry; only the dashboard
/// path projects them into [`NormalizedProduct`] rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// Raw product objects in sorted file-scan order, each stamped with the
    /// `category` of its containing document. Not unique-keyed.
    pub products: Vec<Map<String, Value>>,

    /// Contents of `services.json`, passed through verbatim.
    pub services: Map<String, Value>,

    /// Contents of `policies.json`: policy name to free-text value.
    pub policies: Map<String, Value>,
}

impl Catalog {
    /// Serialize the whole catalog as pretty JSON for the gateway payload.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// Canonical, type-coerced projection of one raw product.
///
/// Every field is always present: missing identity fields get placeholder
/// text, missing quantities coerce to zero. `total_stock` and `price` are
/// never negative. Records that cannot be coerced are dropped during
/// normalization and never reach this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedProduct {
    pub id: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub store_stock: u32,
    pub warehouse_stock: u32,
    /// Always `store_stock + warehouse_stock` of the coerced values.
    pub total_stock: u32,
    pub price: f64,
}
