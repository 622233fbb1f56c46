//! Maps one raw catalog record into relational rows
//!
//! The mapper never contacts the network and never fails a whole batch for
//! a single malformed field: bad tag strings are logged and skipped, missing
//! fields fall back to documented defaults. The only condition that rejects
//! a record outright is a missing or empty barcode.

use crate::record::normalize::{normalize, title_case};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// One row destined for the `products` table
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub barcode: String,
    pub product_name: String,
    pub brand: String,
    pub packaging: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row destined for the `nutrition` table, per 100g values
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionRow {
    pub energy_kcal_100g: f64,
    pub fat_100g: f64,
    pub saturated_fat_100g: f64,
    pub carbohydrates_100g: f64,
    pub sugars_100g: f64,
    pub fiber_100g: f64,
    pub proteins_100g: f64,
    pub salt_100g: f64,
    pub sodium_100g: f64,
}

/// A fully mapped product with all of its dependent rows
///
/// Dependent rows inherit the product's timestamps when staged.
#[derive(Debug, Clone)]
pub struct MappedProduct {
    pub product: ProductRow,
    pub nutrition: Option<NutritionRow>,
    pub ingredients: Vec<String>,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
}

/// Extracts the barcode from a raw record
///
/// The barcode is an opaque string; leading zeros are significant, so
/// numeric values are not accepted.
pub fn barcode_of(raw: &Value) -> Option<&str> {
    raw.get("code")
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())
}

/// Maps a raw catalog record into relational rows
///
/// Returns `None` if the record has no usable barcode; every other field is
/// defaulted or skipped individually.
pub fn map_product(raw: &Value) -> Option<MappedProduct> {
    let barcode = barcode_of(raw)?.to_string();

    let product_name = str_field(raw, "product_name")
        .filter(|name| !name.is_empty())
        .or_else(|| str_field(raw, "name"))
        .unwrap_or_default()
        .to_string();

    let brand = str_field(raw, "brand")
        .filter(|brand| !brand.is_empty())
        .or_else(|| str_field(raw, "brands"))
        .unwrap_or_default()
        .to_string();

    let created_at = timestamp_field(raw, "created_t");
    let updated_at = timestamp_field(raw, "last_modified_t");

    Some(MappedProduct {
        product: ProductRow {
            barcode,
            product_name,
            brand,
            packaging: resolve_packaging(raw),
            created_at,
            updated_at,
        },
        nutrition: map_nutrition(raw),
        ingredients: map_ingredients(raw),
        categories: map_categories(raw),
        countries: map_countries(raw),
    })
}

/// Resolves the packaging description with an ordered fallback
///
/// First match wins: `packaging_text_en`, then `packaging_text`, then the
/// first non-empty value among keys prefixed `packaging_text`, then the
/// normalized values of `packaging_tags` joined with ", ". Non-object input
/// yields an empty string.
pub fn resolve_packaging(raw: &Value) -> String {
    let Some(record) = raw.as_object() else {
        return String::new();
    };

    for key in ["packaging_text_en", "packaging_text"] {
        if let Some(text) = record.get(key).and_then(Value::as_str) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return normalize(trimmed);
            }
        }
    }

    for (key, value) in record {
        if key.starts_with("packaging_text") {
            if let Some(text) = value.as_str() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return normalize(trimmed);
                }
            }
        }
    }

    if let Some(tags) = record.get("packaging_tags").and_then(Value::as_array) {
        let values: Vec<String> = tags
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|tag| tag.split_once(':'))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(normalize)
            .collect();

        if !values.is_empty() {
            return values.join(", ");
        }
    }

    String::new()
}

/// Builds the nutrition row if the record carries a nutrients object
fn map_nutrition(raw: &Value) -> Option<NutritionRow> {
    let nutrients = raw.get("nutriments")?.as_object()?;
    if nutrients.is_empty() {
        return None;
    }

    let field = |key: &str| round2(nutrients.get(key).and_then(Value::as_f64).unwrap_or(0.0));

    Some(NutritionRow {
        energy_kcal_100g: field("energy-kcal_100g"),
        fat_100g: field("fat_100g"),
        saturated_fat_100g: field("saturated-fat_100g"),
        carbohydrates_100g: field("carbohydrates_100g"),
        sugars_100g: field("sugars_100g"),
        fiber_100g: field("fiber_100g"),
        proteins_100g: field("proteins_100g"),
        salt_100g: field("salt_100g"),
        sodium_100g: field("sodium_100g"),
    })
}

/// Maps `ingredients_tags` entries to ingredient labels
///
/// Each tag is normalized first, then reduced to the text after its first
/// colon, so `"en:palm-oil"` becomes `"palm oil"`. Tags without a colon are
/// logged and skipped.
fn map_ingredients(raw: &Value) -> Vec<String> {
    let Some(tags) = raw.get("ingredients_tags").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut ingredients = Vec::new();
    for tag in tags.iter().filter_map(Value::as_str) {
        let normalized = normalize(tag);
        match normalized.split_once(':') {
            Some((_, text)) => ingredients.push(text.to_string()),
            None => tracing::warn!("Skipping ingredient tag without a prefix: {}", tag),
        }
    }
    ingredients
}

/// Maps the comma-separated `categories` field to category labels
fn map_categories(raw: &Value) -> Vec<String> {
    str_field(raw, "categories")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// Maps `countries_tags` entries to country display names
///
/// Each tag is split on its first colon, the tail normalized and
/// title-cased, so `"en:united-states"` becomes `"United States"`. Tags
/// without a colon are logged and skipped.
fn map_countries(raw: &Value) -> Vec<String> {
    let Some(tags) = raw.get("countries_tags").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut countries = Vec::new();
    for tag in tags.iter().filter_map(Value::as_str) {
        match tag.split_once(':') {
            Some((_, value)) => countries.push(title_case(&normalize(value))),
            None => tracing::warn!("Skipping country tag without a prefix: {}", tag),
        }
    }
    countries
}

fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// Reads a Unix-epoch-seconds field, defaulting to epoch 0 when absent
fn timestamp_field(raw: &Value, key: &str) -> DateTime<Utc> {
    let seconds = raw.get(key).and_then(Value::as_i64).unwrap_or(0);
    Utc.timestamp_opt(seconds, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Rounds to 2 decimal places, clamping negatives to zero
fn round2(value: f64) -> f64 {
    (value.max(0.0) * 100.0).round() / 100.0
}
