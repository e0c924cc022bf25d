// Catalogue storage seam and an in-memory implementation
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::catalogue::{AmazonProfile, Product, ProductAttributeValue, ProductId};
use crate::error::MapperError;

// Storage operations the mappers depend on
pub trait CatalogueStore: Send + Sync {
    // Attribute rows of a product restricted to the given attribute codes
    fn attribute_values(
        &self,
        product_id: ProductId,
        codes: &[&str],
    ) -> Result<Vec<ProductAttributeValue>, MapperError>;

    fn amazon_profile(&self, product_id: ProductId) -> Result<Option<AmazonProfile>, MapperError>;

    /// Returns the stored profile for `product`, creating and persisting one
    /// first when none exists. Implementations must make this atomic so that
    /// concurrent callers never create two profiles for the same product.
    fn ensure_amazon_profile(&self, product: &Product) -> Result<AmazonProfile, MapperError>;
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogue {
    attribute_values: RwLock<Vec<ProductAttributeValue>>,
    profiles: DashMap<ProductId, AmazonProfile>,
    profiles_created: AtomicUsize,
}

impl InMemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attribute_value(&self, value: ProductAttributeValue) {
        self.attribute_values.write().push(value);
    }

    pub fn add_attribute_values(&self, values: impl IntoIterator<Item = ProductAttributeValue>) {
        self.attribute_values.write().extend(values);
    }

    pub fn save_profile(&self, profile: AmazonProfile) {
        self.profiles.insert(profile.product_id, profile);
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    // Number of profiles created by `ensure_amazon_profile`
    pub fn profiles_created(&self) -> usize {
        self.profiles_created.load(Ordering::Relaxed)
    }
}

impl CatalogueStore for InMemoryCatalogue {
    fn attribute_values(
        &self,
        product_id: ProductId,
        codes: &[&str],
    ) -> Result<Vec<ProductAttributeValue>, MapperError> {
        let rows = self.attribute_values.read();
        Ok(rows
            .iter()
            .filter(|row| {
                row.product_id == product_id && codes.contains(&row.attribute_code.as_str())
            })
            .cloned()
            .collect())
    }

    fn amazon_profile(&self, product_id: ProductId) -> Result<Option<AmazonProfile>, MapperError> {
        Ok(self.profiles.get(&product_id).map(|entry| entry.value().clone()))
    }

    fn ensure_amazon_profile(&self, product: &Product) -> Result<AmazonProfile, MapperError> {
        let entry = self.profiles.entry(product.id).or_insert_with(|| {
            self.profiles_created.fetch_add(1, Ordering::Relaxed);
            tracing::info!(product_id = product.id, "created amazon profile");
            AmazonProfile::for_product(product)
        });
        Ok(entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_attribute_values_filtered_by_product_and_code() {
        let store = InMemoryCatalogue::new();
        store.add_attribute_values(vec![
            ProductAttributeValue::new(1, "colour", "red"),
            ProductAttributeValue::new(1, "weight", 3),
            ProductAttributeValue::new(2, "colour", "blue"),
        ]);

        let rows = store.attribute_values(1, &["colour", "size"]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].attribute_code, "colour");
    }

    #[test]
    fn test_ensure_profile_is_get_or_create() {
        let store = InMemoryCatalogue::new();
        let product = Product::new(5, "Toaster").with_upc("555");

        assert!(store.amazon_profile(5).unwrap().is_none());
        let created = store.ensure_amazon_profile(&product).unwrap();
        let fetched = store.ensure_amazon_profile(&product).unwrap();

        assert_eq!(created, fetched);
        assert_eq!(created.sku, "555");
        assert_eq!(store.profiles_created(), 1);
        assert_eq!(store.profile_count(), 1);
    }

    #[test]
    fn test_existing_profile_is_not_replaced() {
        let store = InMemoryCatalogue::new();
        let product = Product::new(9, "Blender").with_upc("999");
        store.save_profile(AmazonProfile {
            product_id: 9,
            sku: "BLEND-9".to_string(),
            ..Default::default()
        });

        let profile = store.ensure_amazon_profile(&product).unwrap();
        assert_eq!(profile.sku, "BLEND-9");
        assert_eq!(store.profiles_created(), 0);
    }

    #[test]
    fn test_concurrent_ensure_creates_one_profile() {
        let store = Arc::new(InMemoryCatalogue::new());
        let product = Product::new(11, "Grill");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let product = product.clone();
                thread::spawn(move || store.ensure_amazon_profile(&product).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.profiles_created(), 1);
        assert_eq!(store.profile_count(), 1);
    }
}
