// Feed configuration loaded from JSON
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::catalogue::Product;
use crate::data_mapper::{ProductDataMapper, TableDataMapper};
use crate::error::MapperError;
use crate::feed::FeedEnvelope;
use crate::loader::{MapperClass, MapperLoader, DEFAULT_PRODUCT_MAPPER};
use crate::mapper::{InventoryProductMapper, ProductMapper};
use crate::store::CatalogueStore;
use crate::value::Value;

pub const SAMPLE_CONFIG_PATH: &str = "samples/feed_config.json";

// Registry entry: either a dotted class path or an inline attribute table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DataMapperSpec {
    Class(String),
    Table(TableDataMapper),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedConfig {
    pub merchant_identifier: String,
    #[serde(default)]
    pub product_mapper: Option<String>,
    #[serde(default)]
    pub purge_and_replace: bool,
    // snake_case attribute -> value used by the mapper lookup tier
    #[serde(default)]
    pub mapper_defaults: BTreeMap<String, serde_json::Value>,
    // Product class slug -> data mapper
    #[serde(default)]
    pub product_data_mappers: BTreeMap<String, DataMapperSpec>,
}

impl FeedConfig {
    pub fn from_json(json: &str) -> Result<Self, MapperError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MapperError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn mapper_class(&self) -> Result<MapperClass, MapperError> {
        let loader = MapperLoader::builtin_product_mappers();
        loader
            .load_mapper(self.product_mapper.as_deref(), DEFAULT_PRODUCT_MAPPER)?
            .ok_or_else(|| {
                MapperError::ImproperlyConfigured(format!(
                    "cannot find product mapper class {}",
                    self.product_mapper.as_deref().unwrap_or(DEFAULT_PRODUCT_MAPPER)
                ))
            })
    }

    pub fn defaults(&self) -> Result<BTreeMap<String, Value>, MapperError> {
        let mut defaults = BTreeMap::new();
        for (attr, raw) in &self.mapper_defaults {
            if let Some(value) = json_to_value(attr, raw)? {
                defaults.insert(attr.clone(), value);
            }
        }
        Ok(defaults)
    }

    /// Builds the product mapper with every configured data mapper resolved.
    pub fn build_product_mapper(&self) -> Result<ProductMapper, MapperError> {
        if self.mapper_class()? != MapperClass::Product {
            return Err(MapperError::ImproperlyConfigured(format!(
                "{} does not build product messages",
                self.product_mapper.as_deref().unwrap_or_default()
            )));
        }

        let loader = MapperLoader::builtin_data_mappers();
        let mut mapper = ProductMapper::new();
        for (slug, spec) in &self.product_data_mappers {
            let data_mapper: Box<dyn ProductDataMapper> = match spec {
                DataMapperSpec::Table(table) => Box::new(table.clone()),
                DataMapperSpec::Class(path) => match loader.load_mapper(Some(path.as_str()), path)? {
                    Some(factory) => factory(),
                    None => {
                        tracing::warn!(slug = slug.as_str(), path = path.as_str(), "data mapper class not found");
                        return Err(MapperError::ImproperlyConfigured(format!(
                            "cannot find product data mapper class {}",
                            path
                        )));
                    }
                },
            };
            mapper = mapper.with_data_mapper(slug.clone(), data_mapper);
        }

        for (attr, value) in self.defaults()? {
            mapper = mapper.with_default(attr, value);
        }
        Ok(mapper)
    }

    // Product feed for `products` carrying this configuration's header settings
    pub fn product_feed(
        &self,
        mapper: &ProductMapper,
        store: &dyn CatalogueStore,
        products: &mut [Product],
    ) -> Result<FeedEnvelope, MapperError> {
        let mut envelope = mapper.product_feed(store, &self.merchant_identifier, products)?;
        envelope.purge_and_replace = self.purge_and_replace;
        Ok(envelope)
    }

    pub fn build_inventory_mapper(&self) -> Result<InventoryProductMapper, MapperError> {
        let mut mapper = InventoryProductMapper::new();
        for (attr, value) in self.defaults()? {
            mapper = mapper.with_default(attr, value);
        }
        Ok(mapper)
    }
}

fn json_to_value(attr: &str, raw: &serde_json::Value) -> Result<Option<Value>, MapperError> {
    match raw {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Bool(flag) => Ok(Some(Value::Boolean(*flag))),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(integer) => Ok(Some(Value::Integer(integer))),
            None => number
                .as_f64()
                .map(|decimal| Some(Value::Decimal(decimal)))
                .ok_or_else(|| MapperError::Config(format!("unsupported number for {}", attr))),
        },
        serde_json::Value::String(text) => Ok(Some(Value::Text(text.clone()))),
        _ => Err(MapperError::Config(format!(
            "default for {} must be a scalar",
            attr
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::ProductAttributeValue;
    use crate::store::InMemoryCatalogue;

    #[test]
    fn test_load_sample_config() {
        let result = FeedConfig::from_path(SAMPLE_CONFIG_PATH);
        assert!(result.is_ok(), "Failed to load sample config: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.merchant_identifier, "M_EXAMPLE_123");
        assert_eq!(config.mapper_class().unwrap(), MapperClass::Product);

        let mapper = config.build_product_mapper();
        assert!(mapper.is_ok(), "Failed to build mapper: {:?}", mapper.err());
        let mapper = mapper.unwrap();
        assert_eq!(mapper.data_mapper("tv").unwrap().base_type(), "CE");
        assert_eq!(mapper.data_mapper("pans").unwrap().product_type(), "Kitchen");
    }

    #[test]
    fn test_minimal_config_uses_default_mapper() {
        let config = FeedConfig::from_json(r#"{"merchant_identifier": "M1"}"#).unwrap();
        assert!(config.product_data_mappers.is_empty());
        assert_eq!(config.mapper_class().unwrap(), MapperClass::Product);
    }

    #[test]
    fn test_mapper_path_without_class_is_rejected() {
        let config = FeedConfig::from_json(
            r#"{"merchant_identifier": "M1", "product_mapper": "ProductMapper"}"#,
        )
        .unwrap();
        assert!(matches!(
            config.build_product_mapper(),
            Err(MapperError::ImproperlyConfigured(_))
        ));
    }

    #[test]
    fn test_inventory_mapper_cannot_build_products() {
        let config = FeedConfig::from_json(
            r#"{"merchant_identifier": "M1",
                "product_mapper": "mws_product_feed.mapper.InventoryProductMapper"}"#,
        )
        .unwrap();
        assert_eq!(config.mapper_class().unwrap(), MapperClass::Inventory);
        assert!(config.build_product_mapper().is_err());
        assert!(config.build_inventory_mapper().is_ok());
    }

    #[test]
    fn test_unknown_data_mapper_class_is_rejected() {
        let config = FeedConfig::from_json(
            r#"{"merchant_identifier": "M1",
                "product_data_mappers": {"toys": "mws_product_feed.data_mapper.ToysMapper"}}"#,
        )
        .unwrap();
        match config.build_product_mapper() {
            Err(MapperError::ImproperlyConfigured(msg)) => assert!(msg.contains("ToysMapper")),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_non_scalar_default_is_rejected() {
        let config = FeedConfig::from_json(
            r#"{"merchant_identifier": "M1", "mapper_defaults": {"bullet_point": ["a", "b"]}}"#,
        )
        .unwrap();
        assert!(matches!(config.defaults(), Err(MapperError::Config(_))));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = FeedConfig::from_json("{ not json");
        assert!(matches!(result, Err(MapperError::Config(_))));
    }

    #[test]
    fn test_configured_mapper_end_to_end() {
        let config = FeedConfig::from_json(
            r#"{
                "merchant_identifier": "M_SHOP",
                "purge_and_replace": true,
                "mapper_defaults": {"item_package_quantity": 1, "brand": null},
                "product_data_mappers": {
                    "pans": {"base_type": "Home", "product_type": "Kitchen",
                             "attribute_mapping": {"material": "Material"}}
                }
            }"#,
        )
        .unwrap();
        let mapper = config.build_product_mapper().unwrap();

        let store = InMemoryCatalogue::new();
        store.add_attribute_value(ProductAttributeValue::new(10, "material", "Copper"));
        let mut products = vec![Product::new(10, "Saucepan").with_upc("100").with_class("Pans", "pans")];

        let xml = config
            .product_feed(&mapper, &store, &mut products)
            .unwrap()
            .render()
            .unwrap();
        assert!(xml.contains("<MerchantIdentifier>M_SHOP</MerchantIdentifier>"));
        assert!(xml.contains("<PurgeAndReplace>true</PurgeAndReplace>"));
        assert!(xml.contains("<ItemPackageQuantity>1</ItemPackageQuantity>"));
        assert!(xml.contains("<Material>Copper</Material>"));
        assert!(!xml.contains("<Brand>"));
    }
}
