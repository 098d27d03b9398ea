//! Product normalization.
//!
//! Converts raw product objects, inconsistent in field naming and typing,
//! into canonical [`NormalizedProduct`] rows with numeric stock and price.
//!
//! Coercion rules:
//! - Stock sub-fields accept only JSON numbers; any other type, including
//!   numeric-looking strings, coerces to 0. Floats truncate, negatives
//!   clamp to 0.
//! - Price accepts a number, a string with `$`/`,` decoration, or an
//!   object with a `value` sub-field. A price that still fails to parse
//!   after stripping makes the whole record unprocessable; the caller
//!   drops it and the batch continues.
//!
//! The asymmetry is deliberate: stock is stricter than price, and a
//! numeric-looking stock string silently becomes 0. See DESIGN.md.
//!
//! Field names come in two spellings, canonical English and the legacy
//! Spanish found in older data files. English wins when both are present.

use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::types::NormalizedProduct;

/// Placeholder for a missing product id.
pub const MISSING_ID: &str = "N/A";
/// Placeholder for a missing brand.
pub const MISSING_BRAND: &str = "No brand";
/// Placeholder for a missing model.
pub const MISSING_MODEL: &str = "No model";

/// Normalize one raw product into a canonical record.
///
/// Returns an error only when the record is unprocessable (unparsable
/// price); every other irregularity coerces to a default.
pub fn normalize_product(raw: &Map<String, Value>) -> Result<NormalizedProduct, NormalizeError> {
    let id = text_field(raw, "id", "id", MISSING_ID);
    let price = coerce_price(&id, lookup(raw, "price", "precio"))?;

    let stock = raw.get("stock").and_then(Value::as_object);
    let store_stock = coerce_quantity(stock.and_then(|s| lookup(s, "store", "tienda")));
    let warehouse_stock = coerce_quantity(stock.and_then(|s| lookup(s, "warehouse", "almacen")));

    Ok(NormalizedProduct {
        category: text_field(raw, "category", "categoria", crate::catalog_loader::DEFAULT_CATEGORY),
        brand: text_field(raw, "brand", "marca", MISSING_BRAND),
        model: text_field(raw, "model", "modelo", MISSING_MODEL),
        store_stock,
        warehouse_stock,
        total_stock: store_stock + warehouse_stock,
        price,
        id,
    })
}

/// Normalize a whole product sequence, dropping unprocessable records.
///
/// Drops are logged, never fatal: one bad record does not abort the batch.
pub fn normalize_all(products: &[Map<String, Value>]) -> Vec<NormalizedProduct> {
    products
        .iter()
        .filter_map(|raw| match normalize_product(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("dropping product: {}", e);
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// Look up a field by canonical name, then by its legacy alias.
fn lookup<'a>(object: &'a Map<String, Value>, name: &str, alias: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| object.get(alias))
}

/// Read a display field as text, falling back to placeholder text.
///
/// Strings pass through; numbers render as their decimal form (some data
/// files carry numeric ids). Anything else gets the placeholder.
fn text_field(raw: &Map<String, Value>, name: &str, alias: &str, default: &str) -> String {
    match lookup(raw, name, alias) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Coerce a stock sub-field to a non-negative integer.
///
/// Only JSON numbers are accepted; strings, booleans, and structured
/// values coerce to 0.
fn coerce_quantity(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => {
            let quantity = n.as_f64().unwrap_or(0.0).trunc();
            if quantity <= 0.0 {
                0
            } else {
                quantity as u32
            }
        }
        _ => 0,
    }
}

/// Coerce a price field to a non-negative float.
///
/// An absent price defaults to 0.0. An object reads its `value` sub-field
/// with a 0.0 fallback. Anything else is stringified, stripped of `$` and
/// `,`, and parsed; failure makes the record unprocessable.
fn coerce_price(id: &str, value: Option<&Value>) -> Result<f64, NormalizeError> {
    let value = match value {
        None => return Ok(0.0),
        Some(value) => value,
    };

    let price = match value {
        Value::Object(object) => lookup(object, "value", "valor")
            .and_then(number_like)
            .unwrap_or(0.0),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        other => {
            let text = match other {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let stripped: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
            stripped
                .trim()
                .parse::<f64>()
                .map_err(|_| NormalizeError::UnparsablePrice {
                    id: id.to_string(),
                    raw: text,
                })?
        }
    };

    Ok(price.max(0.0))
}

/// Read a number from a JSON number or a plain numeric string.
fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn missing_stock_object_yields_all_zero_stock() {
        let record = normalize_product(&raw(json!({"id": "P1", "price": 10.0}))).unwrap();
        assert_eq!(record.store_stock, 0);
        assert_eq!(record.warehouse_stock, 0);
        assert_eq!(record.total_stock, 0);
    }

    #[test]
    fn all_price_shapes_normalize_to_the_same_value() {
        for price in [json!("$1,234.50"), json!(1234.5), json!({"value": 1234.5})] {
            let record =
                normalize_product(&raw(json!({"id": "P1", "price": price.clone()}))).unwrap();
            assert!(
                (record.price - 1234.5).abs() < f64::EPSILON,
                "price shape {:?} should normalize to 1234.5, got {}",
                price,
                record.price
            );
        }
    }

    #[test]
    fn unparsable_price_string_is_unprocessable() {
        let result = normalize_product(&raw(json!({"id": "P1", "price": "N/A"})));
        assert!(matches!(result, Err(NormalizeError::UnparsablePrice { .. })));
    }

    #[test]
    fn unprocessable_record_is_dropped_batch_continues() {
        let products = vec![
            raw(json!({"id": "GOOD", "price": "$10.00"})),
            raw(json!({"id": "BAD", "price": "N/A"})),
            raw(json!({"id": "ALSO-GOOD", "price": 5})),
        ];
        let records = normalize_all(&products);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "GOOD");
        assert_eq!(records[1].id, "ALSO-GOOD");
    }

    #[test]
    fn numeric_string_stock_coerces_to_zero() {
        // Strings are rejected for stock even when they look numeric.
        // Price accepts them. The asymmetry is intentional.
        let record = normalize_product(&raw(json!({
            "id": "P1",
            "stock": {"store": "5", "warehouse": 7},
            "price": 1.0
        })))
        .unwrap();
        assert_eq!(record.store_stock, 0);
        assert_eq!(record.warehouse_stock, 7);
        assert_eq!(record.total_stock, 7);
    }

    #[test]
    fn float_stock_truncates_and_negative_stock_clamps() {
        let record = normalize_product(&raw(json!({
            "id": "P1",
            "stock": {"store": 2.9, "warehouse": -4},
            "price": 1.0
        })))
        .unwrap();
        assert_eq!(record.store_stock, 2);
        assert_eq!(record.warehouse_stock, 0);
    }

    #[test]
    fn missing_identity_fields_get_placeholders() {
        let record = normalize_product(&raw(json!({"price": 1.0}))).unwrap();
        assert_eq!(record.id, MISSING_ID);
        assert_eq!(record.brand, MISSING_BRAND);
        assert_eq!(record.model, MISSING_MODEL);
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let record = normalize_product(&raw(json!({"id": "P1"}))).unwrap();
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn price_object_without_value_defaults_to_zero() {
        let record =
            normalize_product(&raw(json!({"id": "P1", "price": {"currency": "USD"}}))).unwrap();
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn negative_price_clamps_to_zero() {
        let record = normalize_product(&raw(json!({"id": "P1", "price": "-15.00"}))).unwrap();
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn legacy_field_spellings_are_accepted() {
        let record = normalize_product(&raw(json!({
            "id": "P1",
            "marca": "Acme",
            "modelo": "X1",
            "stock": {"tienda": 2, "almacen": 10},
            "precio": "$999.99"
        })))
        .unwrap();
        assert_eq!(record.brand, "Acme");
        assert_eq!(record.model, "X1");
        assert_eq!(record.store_stock, 2);
        assert_eq!(record.warehouse_stock, 10);
        assert_eq!(record.total_stock, 12);
        assert!((record.price - 999.99).abs() < 0.001);
    }

    #[test]
    fn canonical_spelling_wins_over_alias() {
        let record = normalize_product(&raw(json!({
            "id": "P1",
            "brand": "Canonical",
            "marca": "Legacy",
            "price": 1.0
        })))
        .unwrap();
        assert_eq!(record.brand, "Canonical");
    }

    #[test]
    fn boolean_stock_coerces_to_zero() {
        let record = normalize_product(&raw(json!({
            "id": "P1",
            "stock": {"store": true, "warehouse": 3},
            "price": 1.0
        })))
        .unwrap();
        assert_eq!(record.store_stock, 0);
        assert_eq!(record.warehouse_stock, 3);
    }
}
