use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use assistant_catalog::catalog_loader::load_catalog;
use assistant_catalog::normalizer::normalize_all;
use assistant_catalog::stock_report::StockReport;
use assistant_catalog::types::NormalizedProduct;
use assistant_gateway::{ChatSession, HostedModelClient};

mod config;

use config::Config;

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DashboardJson {
    generated_at: String,
    data_dir: String,
    products_loaded: usize,
    records_normalized: usize,
    summary: SummaryJson,
    by_category: BTreeMap<String, u64>,
    by_brand: BTreeMap<String, u64>,
    alerts: Vec<AlertJson>,
}

#[derive(Serialize)]
struct SummaryJson {
    valid_products: usize,
    low_stock_products: usize,
    total_stock_value: f64,
}

#[derive(Serialize)]
struct AlertJson {
    id: String,
    brand: String,
    model: String,
    store_stock: u32,
    warehouse_stock: u32,
}

fn build_json(
    report: &StockReport,
    records: &[NormalizedProduct],
    products_loaded: usize,
    data_dir: &str,
) -> DashboardJson {
    DashboardJson {
        generated_at: Utc::now().to_rfc3339(),
        data_dir: data_dir.to_string(),
        products_loaded,
        records_normalized: records.len(),
        summary: SummaryJson {
            valid_products: report.valid_count,
            low_stock_products: report.low_stock_count,
            total_stock_value: report.total_stock_value,
        },
        by_category: report.by_category.clone(),
        by_brand: report.by_brand.clone(),
        alerts: report
            .alerts
            .iter()
            .map(|r| AlertJson {
                id: r.id.clone(),
                brand: r.brand.clone(),
                model: r.model.clone(),
                store_stock: r.store_stock,
                warehouse_stock: r.warehouse_stock,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a number with comma thousands separators.
fn format_dollars(amount: f64) -> String {
    let whole = amount.abs() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };

    if whole < 1_000 {
        return format!("{}{}", sign, whole);
    }

    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

fn print_breakdown(title: &str, breakdown: &BTreeMap<String, u64>) {
    println!("  {}", title);
    for (label, total) in breakdown {
        println!("    {:<24} {:>8}", label, total);
    }
    println!();
}

fn print_dashboard(
    report: &StockReport,
    records: &[NormalizedProduct],
    products_loaded: usize,
    load_ms: u128,
    report_ms: u128,
) {
    println!();
    println!("  \u{2554}{}\u{2557}", "\u{2550}".repeat(62));
    println!("  \u{2551}          STOREFRONT ASSISTANT \u{2014} Stock Dashboard              \u{2551}");
    println!("  \u{255a}{}\u{255d}", "\u{2550}".repeat(62));
    println!();

    println!(
        "  {} products loaded  \u{00b7}  {} normalized  \u{00b7}  {} with valid pricing",
        products_loaded,
        records.len(),
        report.valid_count
    );
    println!(
        "  {} low on store stock  \u{00b7}  ${} total stock value",
        report.low_stock_count,
        format_dollars(report.total_stock_value)
    );
    println!();

    print_breakdown("Stock by category:", &report.by_category);
    print_breakdown("Stock by brand:", &report.by_brand);

    println!("  {:\u{2500}<64}", "");
    println!(
        "  {:<10} {:<12} {:<16} {:>6} {:>6} {:>6} {:>10}",
        "ID", "BRAND", "MODEL", "STORE", "WHSE", "TOTAL", "PRICE"
    );
    let mut by_total: Vec<&NormalizedProduct> = records.iter().collect();
    by_total.sort_by(|a, b| b.total_stock.cmp(&a.total_stock));
    for r in by_total {
        println!(
            "  {:<10} {:<12} {:<16} {:>6} {:>6} {:>6} {:>10}",
            r.id,
            r.brand,
            r.model,
            r.store_stock,
            r.warehouse_stock,
            r.total_stock,
            format!("${:.2}", r.price)
        );
    }
    println!("  {:\u{2500}<64}", "");
    println!();

    if report.alerts.is_empty() {
        println!("  \u{2705} All stock at adequate levels");
    } else {
        println!("  \u{1f6a8} Critical stock alerts:");
        for r in &report.alerts {
            println!(
                "  !  {} {}  \u{2014}  store {}, warehouse {}",
                r.brand, r.model, r.store_stock, r.warehouse_stock
            );
        }
    }

    println!();
    println!(
        "  \u{23f1}  Catalog loaded in {}ms \u{00b7} Report built in {}ms",
        load_ms, report_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn usage() -> ! {
    eprintln!("Usage: assistant-server [--config FILE] [--data-dir DIR] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config     Path to an assistant.toml config file");
    eprintln!("  --data-dir   Catalog directory of *.json documents");
    eprintln!("  --admin-key  Admin secret unlocking the stock dashboard");
    eprintln!("  --json       Output the dashboard as JSON instead of formatted text");
    eprintln!("  --ask        Ask the assistant one question and exit");
    eprintln!("  --chat       Interactive chat (type 'exit' to leave)");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  assistant-server --data-dir data --admin-key $ASSISTANT_ADMIN_SECRET");
    eprintln!("  assistant-server --ask \"which laptops are in stock?\"");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut data_dir_override: Option<PathBuf> = None;
    let mut admin_key: Option<String> = None;
    let mut ask: Option<String> = None;
    let mut chat = false;
    let mut json_output = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(take_value(&args, i)));
                i += 2;
            }
            "--data-dir" => {
                data_dir_override = Some(PathBuf::from(take_value(&args, i)));
                i += 2;
            }
            "--admin-key" => {
                admin_key = Some(take_value(&args, i));
                i += 2;
            }
            "--ask" => {
                ask = Some(take_value(&args, i));
                i += 2;
            }
            "--chat" => {
                chat = true;
                i += 1;
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            "--help" | "-h" => usage(),
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
            }
        }
    }

    let mut config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(dir) = data_dir_override {
        config.data_dir = dir;
    }
    log::debug!("using catalog directory {}", config.data_dir.display());

    // One catalog snapshot, one session. Every mode below reads from it.
    let load_start = Instant::now();
    let catalog = load_catalog(&config.data_dir);
    let load_ms = load_start.elapsed().as_millis();
    let products_loaded = catalog.products.len();

    let mut session = ChatSession::new(catalog, Utc::now());

    if let Some(key) = &admin_key {
        session.verify_admin(key, config.admin_secret.as_deref());
    }

    if let Some(question) = ask {
        let client = HostedModelClient::new(config.gateway.clone());
        let reply = session.respond(&client, &question).await;
        println!("{}", reply);
        return;
    }

    if chat {
        run_chat(&mut session, &config).await;
        return;
    }

    // Default mode: the stock dashboard, admin only.
    if !session.is_admin() {
        eprintln!("The stock dashboard requires a valid --admin-key.");
        process::exit(1);
    }

    let report_start = Instant::now();
    let records = normalize_all(&session.catalog().products);
    let report = StockReport::build(&records);
    let report_ms = report_start.elapsed().as_millis();

    if json_output {
        let dashboard = build_json(
            &report,
            &records,
            products_loaded,
            &config.data_dir.display().to_string(),
        );
        match serde_json::to_string_pretty(&dashboard) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing dashboard: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_dashboard(&report, &records, products_loaded, load_ms, report_ms);
    }
}

fn take_value(args: &[String], i: usize) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires a value", args[i]);
            usage();
        }
    }
}

/// Interactive chat over stdin. One session, so the history window carries
/// across turns exactly as it does in the web surface.
async fn run_chat(session: &mut ChatSession, config: &Config) {
    let client = HostedModelClient::new(config.gateway.clone());
    let stdin = io::stdin();

    println!("Chat with the catalog assistant. Type 'exit' to leave.");
    loop {
        print!("you> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "exit" || query == "quit" {
            break;
        }

        let reply = session.respond(&client, query).await;
        println!("{}", reply);
        println!();
    }
}
