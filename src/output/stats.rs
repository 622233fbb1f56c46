//! Statistics over the product database
//!
//! Backs the `--stats` CLI mode: row counts per table, loaded from the
//! storage layer and printed in a formatted summary.

use crate::storage::Storage;
use crate::Result;

/// Row counts across the product tables
#[derive(Debug, Clone)]
pub struct IngestStatistics {
    /// Number of persisted products
    pub products: u64,

    /// Number of nutrition rows
    pub nutrition_rows: u64,

    /// Number of ingredient rows
    pub ingredient_rows: u64,

    /// Number of category rows
    pub category_rows: u64,

    /// Number of country rows
    pub country_rows: u64,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> Result<IngestStatistics> {
    Ok(IngestStatistics {
        products: storage.count_products()?,
        nutrition_rows: storage.count_nutrition_rows()?,
        ingredient_rows: storage.count_ingredient_rows()?,
        category_rows: storage.count_category_rows()?,
        country_rows: storage.count_country_rows()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IngestStatistics) {
    println!("=== Product Database Statistics ===\n");

    println!("Products:    {}", stats.products);
    println!("Nutrition:   {}", stats.nutrition_rows);
    println!("Ingredients: {}", stats.ingredient_rows);
    println!("Categories:  {}", stats.category_rows);
    println!("Countries:   {}", stats.country_rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::map_product;
    use crate::storage::SqliteStorage;
    use serde_json::json;

    #[test]
    fn test_load_statistics_counts_rows() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        let mapped = map_product(&json!({
            "code": "123",
            "nutriments": {"fat_100g": 1.0},
            "ingredients_tags": ["en:sugar", "en:salt"],
            "categories": "Snacks",
            "countries_tags": ["en:france"]
        }))
        .unwrap();
        storage.stage_product(&mapped).unwrap();

        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.products, 1);
        assert_eq!(stats.nutrition_rows, 1);
        assert_eq!(stats.ingredient_rows, 2);
        assert_eq!(stats.category_rows, 1);
        assert_eq!(stats.country_rows, 1);
    }

    #[test]
    fn test_load_statistics_on_empty_database() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.products, 0);
        assert_eq!(stats.nutrition_rows, 0);
    }
}
