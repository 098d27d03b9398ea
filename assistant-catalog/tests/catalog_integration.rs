use std::fs::File;
use std::io::Write;

use tempfile::TempDir;

use assistant_catalog::catalog_loader::load_catalog;
use assistant_catalog::normalizer::normalize_all;
use assistant_catalog::stock_report::{is_alert, StockReport};

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn write_file(dir: &TempDir, name: &str, contents: &str) {
    let mut file = File::create(dir.path().join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

/// A small but realistic catalog directory: two product documents, the two
/// named singletons, one malformed file, and one unclassified file.
fn sample_catalog_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "laptops.json",
        r#"{
            "category": "Laptops",
            "products": [
                {"id": "L1", "brand": "Acme", "model": "AeroBook",
                 "stock": {"store": 12, "warehouse": 30}, "price": "$1,299.00"},
                {"id": "L2", "brand": "Zenith", "model": "Slab 15",
                 "stock": {"store": 2, "warehouse": 8}, "price": 899.5}
            ]
        }"#,
    );
    write_file(
        &dir,
        "accessories.json",
        r#"{
            "category": "Accessories",
            "products": [
                {"id": "A1", "brand": "Acme", "model": "Dock",
                 "stock": {"store": 40, "warehouse": 2}, "price": {"value": 79.0}},
                {"id": "A2", "brand": "Nimbus", "model": "Sleeve", "price": "N/A"}
            ]
        }"#,
    );
    write_file(&dir, "services.json", r#"{"repair": "in-store, 48h"}"#);
    write_file(
        &dir,
        "policies.json",
        r#"{"returns": "30 days with receipt", "shipping": "2-4 business days"}"#,
    );
    write_file(&dir, "broken.json", "{oops");
    write_file(&dir, "notes.json", r#"{"todo": "count the back room"}"#);
    dir
}

// ---------------------------------------------------------------------------
// End-to-end: load -> normalize -> aggregate
// ---------------------------------------------------------------------------

#[test]
fn full_pipeline_over_a_catalog_directory() {
    let dir = sample_catalog_dir();
    let catalog = load_catalog(dir.path());

    // accessories.json sorts before laptops.json.
    assert_eq!(catalog.products.len(), 4);
    assert_eq!(catalog.products[0]["category"], "Accessories");
    assert_eq!(catalog.services["repair"], "in-store, 48h");
    assert_eq!(catalog.policies["returns"], "30 days with receipt");

    // A2 has an unparsable price and is dropped during normalization.
    let records = normalize_all(&catalog.products);
    assert_eq!(records.len(), 3);

    let report = StockReport::build(&records);
    assert_eq!(report.valid_count, 3);
    // A1: 42 x $79 + L1: 42 x $1,299 + L2: 10 x $899.50 = $66,913
    assert!((report.total_stock_value - (42.0 * 79.0 + 42.0 * 1299.0 + 10.0 * 899.5)).abs() < 0.01);
    // L2 (store 2) is low stock; A1 and L1 are not.
    assert_eq!(report.low_stock_count, 1);
    // A1: 40+2 = 42.  L1: 12+30 = 42, L2: 2+8 = 10.
    assert_eq!(report.by_category["Accessories"], 42);
    assert_eq!(report.by_category["Laptops"], 52);
    // Alerts: L2 (store 2 < 3) and A1 (warehouse 2 < 5), in table order.
    let alert_ids: Vec<&str> = report.alerts.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(alert_ids, vec!["A1", "L2"]);
}

#[test]
fn single_record_scenario_matches_expected_row() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "laptops.json",
        r#"{"category":"Laptops","products":[{"id":"P1","marca":"Acme","modelo":"X1","stock":{"tienda":2,"almacen":10},"precio":"$999.99"}]}"#,
    );

    let catalog = load_catalog(dir.path());
    let records = normalize_all(&catalog.products);
    assert_eq!(records.len(), 1);

    let row = &records[0];
    assert_eq!(row.category, "Laptops");
    assert_eq!(row.brand, "Acme");
    assert_eq!(row.model, "X1");
    assert_eq!(row.store_stock, 2);
    assert_eq!(row.warehouse_stock, 10);
    assert_eq!(row.total_stock, 12);
    assert!((row.price - 999.99).abs() < 0.001);

    // store_stock 2 < 3 makes this an alert.
    assert!(is_alert(row));
    let report = StockReport::build(&records);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].id, "P1");
}

#[test]
fn breakdowns_conserve_totals_over_a_loaded_catalog() {
    let dir = sample_catalog_dir();
    let catalog = load_catalog(dir.path());
    let records = normalize_all(&catalog.products);
    let report = StockReport::build(&records);

    let grand_total: u64 = records.iter().map(|r| u64::from(r.total_stock)).sum();
    assert_eq!(report.by_category.values().sum::<u64>(), grand_total);
    assert_eq!(report.by_brand.values().sum::<u64>(), grand_total);
}

#[test]
fn reload_rebuilds_the_catalog_from_scratch() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.json", r#"{"category": "A", "products": [{"id": "A1", "price": 1}]}"#);

    let first = load_catalog(dir.path());
    assert_eq!(first.products.len(), 1);

    // Replace the file wholesale; a reload must not accumulate.
    write_file(&dir, "a.json", r#"{"category": "A", "products": [{"id": "A2", "price": 2}]}"#);
    let second = load_catalog(dir.path());
    assert_eq!(second.products.len(), 1);
    assert_eq!(second.products[0]["id"], "A2");
}
