// Resolution of dotted class paths used by pluggable configuration
use std::collections::BTreeMap;

use crate::data_mapper::{ConsumerElectronicsMapper, HomeMapper, ProductDataMapper};
use crate::error::MapperError;

pub const DEFAULT_PRODUCT_MAPPER: &str = "mws_product_feed.mapper.ProductMapper";

// Product mapper classes selectable by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperClass {
    Product,
    Inventory,
}

pub type DataMapperFactory = fn() -> Box<dyn ProductDataMapper>;

/// Registry of classes addressable as `module.path.ClassName`.
pub struct MapperLoader<T> {
    modules: BTreeMap<String, BTreeMap<String, T>>,
}

impl<T: Clone> MapperLoader<T> {
    pub fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, module: &str, class_name: &str, class: T) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(class_name.to_string(), class);
    }

    /// Loads the class named by `name`, or by `default` when `name` is absent
    /// or empty. A path without a class segment is a configuration error, an
    /// unknown module is an import error and an unknown class in a known
    /// module yields `None`.
    pub fn load_mapper(&self, name: Option<&str>, default: &str) -> Result<Option<T>, MapperError> {
        let name = name.filter(|name| !name.is_empty()).unwrap_or(default);
        let (module_label, class_name) = name.rsplit_once('.').ok_or_else(|| {
            MapperError::ImproperlyConfigured(format!(
                "cannot find product mapper class {}",
                name
            ))
        })?;

        let module = self
            .modules
            .get(module_label)
            .ok_or_else(|| MapperError::ImportError(module_label.to_string()))?;
        Ok(module.get(class_name).cloned())
    }
}

impl<T: Clone> Default for MapperLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperLoader<MapperClass> {
    pub fn builtin_product_mappers() -> Self {
        let mut loader = Self::new();
        loader.register("mws_product_feed.mapper", "ProductMapper", MapperClass::Product);
        loader.register(
            "mws_product_feed.mapper",
            "InventoryProductMapper",
            MapperClass::Inventory,
        );
        loader
    }
}

impl MapperLoader<DataMapperFactory> {
    pub fn builtin_data_mappers() -> Self {
        let mut loader = Self::new();
        loader.register(
            "mws_product_feed.data_mapper",
            "ConsumerElectronicsMapper",
            consumer_electronics_mapper,
        );
        loader.register("mws_product_feed.data_mapper", "HomeMapper", home_mapper);
        loader
    }
}

fn consumer_electronics_mapper() -> Box<dyn ProductDataMapper> {
    Box::new(ConsumerElectronicsMapper::new())
}

fn home_mapper() -> Box<dyn ProductDataMapper> {
    Box::new(HomeMapper::new())
}
