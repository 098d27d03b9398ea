//! Grounding context for the assistant.
//!
//! Derives a short natural-language summary of the catalog: timestamp,
//! product count, distinct categories and brands, and the returns/shipping
//! policy excerpts. This string, together with the raw catalog
//! serialization, is the grounding payload handed to the gateway. No model
//! calls happen here; the only fallback behavior is the missing-policy
//! defaults.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::Catalog;

/// Returns policy shown when the catalog carries none.
pub const DEFAULT_RETURNS_POLICY: &str = "30 days";
/// Shipping policy shown when the catalog carries none.
pub const DEFAULT_SHIPPING_POLICY: &str = "3-5 business days";
/// Policy excerpts are cut at this many characters to keep the context bounded.
const POLICY_EXCERPT_MAX: usize = 280;

/// Build the grounding context string for one catalog snapshot.
///
/// Categories and brands are deduplicated and rendered in sorted order, so
/// the output is independent of product ordering.
pub fn build_context(catalog: &Catalog, now: DateTime<Utc>) -> String {
    let mut categories: BTreeSet<&str> = BTreeSet::new();
    let mut brands: BTreeSet<&str> = BTreeSet::new();
    for product in &catalog.products {
        if let Some(category) = product.get("category").and_then(Value::as_str) {
            categories.insert(category);
        }
        if let Some(brand) = product
            .get("brand")
            .or_else(|| product.get("marca"))
            .and_then(Value::as_str)
        {
            brands.insert(brand);
        }
    }

    let returns = policy_excerpt(catalog, "returns", "devoluciones", DEFAULT_RETURNS_POLICY);
    let shipping = policy_excerpt(catalog, "shipping", "envios", DEFAULT_SHIPPING_POLICY);

    format!(
        "You are the store's virtual shopping assistant. Catalog data as of {}:\n\
         \n\
         **Available products:**\n\
         - Total: {} products\n\
         - Categories: {}\n\
         - Brands: {}\n\
         \n\
         **Policies:**\n\
         - Returns: {}\n\
         - Shipping: {}\n\
         \n\
         **Instructions:**\n\
         1. Answer clearly, with formatting\n\
         2. Highlight technical characteristics\n\
         3. Verify available stock before recommending\n\
         4. Use Markdown for presentation\n",
        now.format("%d/%m/%Y %H:%M"),
        catalog.products.len(),
        join(&categories),
        join(&brands),
        returns,
        shipping,
    )
}

fn join(labels: &BTreeSet<&str>) -> String {
    labels.iter().copied().collect::<Vec<_>>().join(", ")
}

/// Read one policy value as text, truncated, with a fixed default.
fn policy_excerpt(catalog: &Catalog, name: &str, alias: &str, default: &str) -> String {
    let text = match catalog.policies.get(name).or_else(|| catalog.policies.get(alias)) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    };
    truncate(&text, POLICY_EXCERPT_MAX)
}

/// Cut a string at a character count without splitting a code point.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
