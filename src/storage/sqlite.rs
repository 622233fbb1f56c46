//! SQLite storage implementation
//!
//! This module provides the SQLite-backed implementation of the Storage
//! trait. The batch transaction is driven with explicit BEGIN/COMMIT/
//! ROLLBACK statements so the pipeline can hold it open across the whole
//! run without borrowing the connection.

use crate::record::MappedProduct;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::FoodfetchError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at the given path
    ///
    /// Applies the performance and integrity pragmas and initializes the
    /// schema, which is idempotent.
    pub fn new(path: &Path) -> Result<Self, FoodfetchError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, FoodfetchError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Closes the connection, surfacing any pending error
    ///
    /// Dropping the storage closes the connection too; this variant exists
    /// so a close failure at the end of a run is reported instead of
    /// swallowed.
    pub fn close(self) -> Result<(), FoodfetchError> {
        self.conn.close().map_err(|(_conn, e)| e.into())
    }

    fn count_table(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    fn begin(&mut self) -> StorageResult<()> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> StorageResult<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> StorageResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn product_exists(&self, barcode: &str) -> StorageResult<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM products WHERE barcode = ?1",
                params![barcode],
                |row| row.get(0),
            )
            .optional()?;

        Ok(existing.is_some())
    }

    fn stage_product(&mut self, mapped: &MappedProduct) -> StorageResult<i64> {
        let product = &mapped.product;
        let created_at = product.created_at.to_rfc3339();
        let updated_at = product.updated_at.to_rfc3339();

        self.conn.execute(
            "INSERT INTO products (barcode, product_name, brand, packaging, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                product.barcode,
                product.product_name,
                product.brand,
                product.packaging,
                created_at,
                updated_at
            ],
        )?;
        let product_id = self.conn.last_insert_rowid();

        if let Some(nutrition) = &mapped.nutrition {
            self.conn.execute(
                "INSERT INTO nutrition
                 (product_id, energy_kcal_100g, fat_100g, saturated_fat_100g,
                  carbohydrates_100g, sugars_100g, fiber_100g, proteins_100g,
                  salt_100g, sodium_100g, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    product_id,
                    nutrition.energy_kcal_100g,
                    nutrition.fat_100g,
                    nutrition.saturated_fat_100g,
                    nutrition.carbohydrates_100g,
                    nutrition.sugars_100g,
                    nutrition.fiber_100g,
                    nutrition.proteins_100g,
                    nutrition.salt_100g,
                    nutrition.sodium_100g,
                    created_at,
                    updated_at
                ],
            )?;
        }

        for ingredient in &mapped.ingredients {
            self.conn.execute(
                "INSERT INTO ingredients (product_id, ingredient_text, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![product_id, ingredient, created_at, updated_at],
            )?;
        }

        for category in &mapped.categories {
            self.conn.execute(
                "INSERT INTO categories (product_id, category, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![product_id, category, created_at, updated_at],
            )?;
        }

        for country in &mapped.countries {
            self.conn.execute(
                "INSERT INTO countries (product_id, country, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![product_id, country, created_at, updated_at],
            )?;
        }

        Ok(product_id)
    }

    // ===== Statistics =====

    fn count_products(&self) -> StorageResult<u64> {
        self.count_table("SELECT COUNT(*) FROM products")
    }

    fn count_nutrition_rows(&self) -> StorageResult<u64> {
        self.count_table("SELECT COUNT(*) FROM nutrition")
    }

    fn count_ingredient_rows(&self) -> StorageResult<u64> {
        self.count_table("SELECT COUNT(*) FROM ingredients")
    }

    fn count_category_rows(&self) -> StorageResult<u64> {
        self.count_table("SELECT COUNT(*) FROM categories")
    }

    fn count_country_rows(&self) -> StorageResult<u64> {
        self.count_table("SELECT COUNT(*) FROM countries")
    }
}
