// Product and inventory mappers producing MWS feed message bodies
use std::collections::BTreeMap;

use crate::catalogue::Product;
use crate::data_mapper::ProductDataMapper;
use crate::element::Element;
use crate::error::MapperError;
use crate::feed::{FeedEnvelope, MessageType};
use crate::resolver::{AttributeSource, ResolutionChain, Scope};
use crate::store::CatalogueStore;
use crate::value::{self, Value};

pub const BASE_ATTRIBUTES: &[&str] = &[
    "SKU",
    "StandardProductID",
    "ProductTaxCode",
    "LaunchDate",
    "DiscontinueDate",
    "ReleaseDate",
    "ExternalProductUrl",
    "OffAmazonChannel",
    "OnAmazonChannel",
    "Condition",
    "Rebate",
    "ItemPackageQuantity",
    "NumberOfItems",
];

pub const DESCRIPTION_DATA_ATTRIBUTES: &[&str] = &[
    "Title",
    "Brand",
    "Designer",
    "Description",
    "BulletPoint",
    "ItemDimensions",
    "PackageDimensions",
    "PackageWeight",
    "ShippingWeight",
    "MerchantCatalogNumber",
    "MSRP",
    "MaxOrderQuantity",
    "SerialNumberRequired",
    "Prop65",
    "LegalDisclaimer",
    "Manufacturer",
    "MfrPartNumber",
    "SearchTerms",
    "PlatinumKeywords",
    "RecommendedBrowseNode",
    "Memorabilia",
    "Autographed",
    "UsedFor",
    "ItemType",
    "OtherItemAttributes",
    "TargetAudience",
    "SubjectContent",
    "IsGiftWrapAvailable",
    "IsGiftMessageAvailable",
    "IsDiscontinuedByManufacturer",
    "MaxAggregateShipQuantity",
];

pub const INVENTORY_ATTRIBUTES: &[&str] = &["SKU", "Quantity", "FulfillmentLatency"];

/// Value resolution shared by all product mappers.
///
/// Values are looked up on the product's Amazon profile, then the product,
/// then the mapper itself; the first truthy value becomes the element.
pub trait BaseProductMapper: AttributeSource + Sized {
    fn convert_camel_case(&self, name: &str) -> String {
        crate::resolver::convert_camel_case(name)
    }

    /// Computed mapper-tier value derived from the product being mapped.
    ///
    /// Consulted before the mapper's own accessors and fields; a `Some`
    /// result is final for the mapper tier even when it holds nothing.
    fn product_accessor(&self, _product: &Product, _attr: &str) -> Option<Option<Value>> {
        None
    }

    fn get_value_element(&self, product: &Product, attr_name: &str) -> Option<Element> {
        let bound = BoundMapper {
            mapper: self,
            product,
        };
        let mut chain = ResolutionChain::new();
        if let Some(profile) = &product.amazon_profile {
            chain = chain.then(Scope::AmazonProfile, profile);
        }
        chain
            .then(Scope::Product, product)
            .then(Scope::Mapper, &bound)
            .get_value_element(attr_name)
    }

    // Ensures the profile exists, then appends one element per resolved name
    fn add_attributes(
        &self,
        store: &dyn CatalogueStore,
        product: &mut Product,
        elem: &mut Element,
        attr_names: &[&str],
    ) -> Result<(), MapperError> {
        ensure_profile(store, product)?;

        for attr in attr_names {
            if let Some(attr_elem) = self.get_value_element(product, attr) {
                elem.append(attr_elem);
            }
        }
        Ok(())
    }
}

// Mapper tier seen while mapping one product
struct BoundMapper<'a, M> {
    mapper: &'a M,
    product: &'a Product,
}

impl<M: BaseProductMapper> AttributeSource for BoundMapper<'_, M> {
    fn accessor(&self, attr: &str) -> Option<Option<Value>> {
        self.mapper
            .product_accessor(self.product, attr)
            .or_else(|| self.mapper.accessor(attr))
    }

    fn field(&self, attr: &str) -> Option<Value> {
        self.mapper.field(attr)
    }
}

/// Loads or creates the product's Amazon profile and caches it on the
/// product so later lookups don't go back to the store.
pub fn ensure_profile(store: &dyn CatalogueStore, product: &mut Product) -> Result<(), MapperError> {
    if product.amazon_profile.is_none() {
        product.amazon_profile = Some(store.ensure_amazon_profile(product)?);
    }
    Ok(())
}

/// Computes a mapper-tier value from the product being mapped.
pub type MapperAccessor = Box<dyn Fn(&Product) -> Option<Value> + Send + Sync>;

#[derive(Default)]
pub struct ProductMapper {
    // Product class slug -> data mapper
    product_data_mappers: BTreeMap<String, Box<dyn ProductDataMapper>>,
    // snake_case attribute -> computed value
    accessors: BTreeMap<String, MapperAccessor>,
    defaults: BTreeMap<String, Value>,
}

impl ProductMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_mapper(
        mut self,
        slug: impl Into<String>,
        mapper: Box<dyn ProductDataMapper>,
    ) -> Self {
        self.product_data_mappers.insert(slug.into(), mapper);
        self
    }

    // Fallback value used when neither profile nor product provide one
    pub fn with_default(mut self, attr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(attr.into(), value.into());
        self
    }

    // Registers a computed value for `attr`; it shadows any default of the same name
    pub fn with_accessor<F>(mut self, attr: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Product) -> Option<Value> + Send + Sync + 'static,
    {
        self.accessors.insert(attr.into(), Box::new(accessor));
        self
    }

    pub fn data_mapper(&self, slug: &str) -> Option<&dyn ProductDataMapper> {
        self.product_data_mappers.get(slug).map(|mapper| mapper.as_ref())
    }

    pub fn serialise(&self, value: Option<&Value>) -> String {
        value::serialise(value)
    }

    pub fn get_product_xml(
        &self,
        store: &dyn CatalogueStore,
        product: &mut Product,
    ) -> Result<Element, MapperError> {
        let mut product_elem = Element::new("Product");
        self.add_attributes(store, product, &mut product_elem, BASE_ATTRIBUTES)?;

        let mut desc_elem = Element::new("DescriptionData");
        self.add_attributes(store, product, &mut desc_elem, DESCRIPTION_DATA_ATTRIBUTES)?;
        product_elem.append(desc_elem);

        let mapper = product.class_slug().and_then(|slug| self.data_mapper(slug));
        match mapper {
            Some(mapper) => {
                tracing::debug!(
                    product_id = product.id,
                    product_type = mapper.product_type(),
                    "using product data mapper"
                );
                if let Some(sub_tree) = mapper.get_product_data(store, product)? {
                    product_elem.append(Element::new("ProductData").with_child(sub_tree));
                }
            }
            None => {
                tracing::debug!(
                    product_id = product.id,
                    slug = product.class_slug(),
                    "no product data mapper for product class"
                );
            }
        }

        Ok(product_elem)
    }

    // One `Product` message per product, wrapped in an envelope
    pub fn product_feed(
        &self,
        store: &dyn CatalogueStore,
        merchant_identifier: &str,
        products: &mut [Product],
    ) -> Result<FeedEnvelope, MapperError> {
        let mut envelope = FeedEnvelope::new(merchant_identifier, MessageType::Product);
        for product in products.iter_mut() {
            envelope.push(self.get_product_xml(store, product)?);
        }
        tracing::debug!(messages = envelope.len(), "built product feed");
        Ok(envelope)
    }
}

impl AttributeSource for ProductMapper {
    fn field(&self, attr: &str) -> Option<Value> {
        self.defaults.get(attr).cloned()
    }
}

impl BaseProductMapper for ProductMapper {
    fn product_accessor(&self, product: &Product, attr: &str) -> Option<Option<Value>> {
        self.accessors.get(attr).map(|accessor| accessor(product))
    }
}

#[derive(Debug, Default)]
pub struct InventoryProductMapper {
    defaults: BTreeMap<String, Value>,
}

impl InventoryProductMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, attr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(attr.into(), value.into());
        self
    }

    pub fn get_inventory_xml(
        &self,
        store: &dyn CatalogueStore,
        product: &mut Product,
    ) -> Result<Element, MapperError> {
        let mut inventory_elem = Element::new("Inventory");
        self.add_attributes(store, product, &mut inventory_elem, INVENTORY_ATTRIBUTES)?;
        Ok(inventory_elem)
    }

    pub fn inventory_feed(
        &self,
        store: &dyn CatalogueStore,
        merchant_identifier: &str,
        products: &mut [Product],
    ) -> Result<FeedEnvelope, MapperError> {
        let mut envelope = FeedEnvelope::new(merchant_identifier, MessageType::Inventory);
        for product in products.iter_mut() {
            envelope.push(self.get_inventory_xml(store, product)?);
        }
        Ok(envelope)
    }
}

impl AttributeSource for InventoryProductMapper {
    fn field(&self, attr: &str) -> Option<Value> {
        self.defaults.get(attr).cloned()
    }
}

impl BaseProductMapper for InventoryProductMapper {}
