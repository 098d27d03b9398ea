//! Stock aggregation for the dashboard.
//!
//! Pure functions of the normalized record sequence; no hidden state, safe
//! to recompute on every display refresh. The report carries:
//! - valid-subset metrics (records with price > 0): count, low-stock count,
//!   total stock value
//! - per-category and per-brand total_stock breakdowns over the full table
//! - critical stock alerts over the full table, in original record order

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::NormalizedProduct;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Store-floor quantity below which a valid record counts as low stock.
const LOW_STOCK_STORE_QTY: u32 = 5;
/// Store-floor quantity below which a record raises a critical alert.
const ALERT_STORE_QTY: u32 = 3;
/// Warehouse quantity below which a record raises a critical alert.
const ALERT_WAREHOUSE_QTY: u32 = 5;

/// Aggregated stock metrics over one normalized table.
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    /// Records in the valid subset (price > 0 and total_stock >= 0; the
    /// stock bound always holds after normalization, so this is
    /// effectively a price filter).
    pub valid_count: usize,
    /// Valid-subset records with store stock below the low-stock line.
    pub low_stock_count: usize,
    /// Sum of total_stock x price over the valid subset.
    pub total_stock_value: f64,
    /// total_stock summed per distinct category string. Grouping is by the
    /// literal value: no case-folding, no trimming.
    pub by_category: BTreeMap<String, u64>,
    /// total_stock summed per distinct brand string, same semantics.
    pub by_brand: BTreeMap<String, u64>,
    /// Critically low records from the FULL table, in original order.
    pub alerts: Vec<NormalizedProduct>,
}

/// Is this record critically low on stock?
pub fn is_alert(record: &NormalizedProduct) -> bool {
    record.store_stock < ALERT_STORE_QTY || record.warehouse_stock < ALERT_WAREHOUSE_QTY
}

impl StockReport {
    /// Compute the full report from a normalized table.
    pub fn build(records: &[NormalizedProduct]) -> Self {
        let valid: Vec<&NormalizedProduct> = records
            .iter()
            .filter(|r| r.price > 0.0)
            .collect();

        let total_stock_value = valid
            .iter()
            .map(|r| f64::from(r.total_stock) * r.price)
            .sum();

        let low_stock_count = valid
            .iter()
            .filter(|r| r.store_stock < LOW_STOCK_STORE_QTY)
            .count();

        let mut by_category: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_brand: BTreeMap<String, u64> = BTreeMap::new();
        for record in records {
            *by_category.entry(record.category.clone()).or_insert(0) +=
                u64::from(record.total_stock);
            *by_brand.entry(record.brand.clone()).or_insert(0) += u64::from(record.total_stock);
        }

        let alerts = records.iter().filter(|r| is_alert(r)).cloned().collect();

        StockReport {
            valid_count: valid.len(),
            low_stock_count,
            total_stock_value,
            by_category,
            by_brand,
            alerts,
        }
    }
}
