//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the foodfetch
//! database. The barcode is the unique business key; dependents reference
//! the surrogate product ID and are removed with their product.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Products, one per barcode
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    barcode TEXT NOT NULL UNIQUE,
    product_name TEXT NOT NULL,
    brand TEXT NOT NULL,
    packaging TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_barcode ON products(barcode);

-- Per-100g nutritional values, at most one row per product
CREATE TABLE IF NOT EXISTS nutrition (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    energy_kcal_100g REAL NOT NULL,
    fat_100g REAL NOT NULL,
    saturated_fat_100g REAL NOT NULL,
    carbohydrates_100g REAL NOT NULL,
    sugars_100g REAL NOT NULL,
    fiber_100g REAL NOT NULL,
    proteins_100g REAL NOT NULL,
    salt_100g REAL NOT NULL,
    sodium_100g REAL NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_nutrition_product ON nutrition(product_id);

-- Normalized ingredient labels
CREATE TABLE IF NOT EXISTS ingredients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    ingredient_text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ingredients_product ON ingredients(product_id);

-- Trimmed category labels
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_categories_product ON categories(product_id);

-- Normalized country labels
CREATE TABLE IF NOT EXISTS countries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    country TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_countries_product ON countries(product_id);
"#;

/// Initializes the database schema
///
/// Creating existing tables is a no-op, so this is safe to run on every
/// process start.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
