// Catalogue records read by the mappers
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::resolver::AttributeSource;
use crate::value::Value;

pub type ProductId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductClass {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub upc: Option<String>,
    pub title: String,
    pub description: String,
    pub product_class: Option<ProductClass>,
    // Child products inherit title and class from their parent
    pub parent: Option<Box<Product>>,
    pub date_created: Option<NaiveDateTime>,
    pub fields: BTreeMap<String, Value>,
    // Filled by the "ensure profile" step of the mappers
    pub amazon_profile: Option<AmazonProfile>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_upc(mut self, upc: impl Into<String>) -> Self {
        self.upc = Some(upc.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_class(mut self, name: impl Into<String>, slug: impl Into<String>) -> Self {
        self.product_class = Some(ProductClass {
            name: name.into(),
            slug: slug.into(),
        });
        self
    }

    pub fn with_parent(mut self, parent: Product) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get_title(&self) -> String {
        if self.title.is_empty() {
            if let Some(parent) = &self.parent {
                return parent.title.clone();
            }
        }
        self.title.clone()
    }

    /// Slug of the product class, falling back to the parent's class.
    pub fn class_slug(&self) -> Option<&str> {
        match (&self.product_class, &self.parent) {
            (Some(class), _) => Some(class.slug.as_str()),
            (None, Some(parent)) => parent.class_slug(),
            (None, None) => None,
        }
    }
}

impl AttributeSource for Product {
    fn accessor(&self, attr: &str) -> Option<Option<Value>> {
        match attr {
            "title" => Some(Some(Value::Text(self.get_title()))),
            _ => None,
        }
    }

    fn field(&self, attr: &str) -> Option<Value> {
        match attr {
            "upc" => self.upc.clone().map(Value::Text),
            "title" => Some(Value::Text(self.title.clone())),
            "description" => Some(Value::Text(self.description.clone())),
            "date_created" => self.date_created.map(Value::DateTime),
            _ => self.fields.get(attr).cloned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductIdType {
    #[serde(rename = "ISBN")]
    Isbn,
    #[serde(rename = "UPC")]
    Upc,
    #[serde(rename = "EAN")]
    Ean,
    #[serde(rename = "ASIN")]
    Asin,
    #[serde(rename = "GTIN")]
    Gtin,
}

impl ProductIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductIdType::Isbn => "ISBN",
            ProductIdType::Upc => "UPC",
            ProductIdType::Ean => "EAN",
            ProductIdType::Asin => "ASIN",
            ProductIdType::Gtin => "GTIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardProductId {
    pub id_type: ProductIdType,
    pub value: String,
}

impl StandardProductId {
    pub fn to_element(&self) -> Element {
        Element::new("StandardProductID")
            .with_child(Element::with_text("Type", self.id_type.as_str()))
            .with_child(Element::with_text("Value", self.value.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FulfillmentChannel {
    // Fulfilled by the merchant
    #[default]
    #[serde(rename = "MFN")]
    Merchant,
    // Fulfilled by Amazon
    #[serde(rename = "AFN")]
    Amazon,
}

impl FulfillmentChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentChannel::Merchant => "MFN",
            FulfillmentChannel::Amazon => "AFN",
        }
    }
}

// MWS specific data kept alongside a product
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmazonProfile {
    pub product_id: ProductId,
    pub sku: String,
    pub standard_product_id: Option<StandardProductId>,
    pub fulfillment_by: FulfillmentChannel,
    pub item_package_quantity: Option<u32>,
    pub number_of_items: Option<u32>,
    pub fulfillment_latency: Option<u32>,
    pub launch_date: Option<NaiveDateTime>,
    pub release_date: Option<NaiveDateTime>,
    pub product_tax_code: Option<String>,
    pub condition: Option<String>,
}

impl AmazonProfile {
    /// Fresh profile for `product`, with the SKU defaulting to its UPC.
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            sku: product.upc.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

impl AttributeSource for AmazonProfile {
    fn accessor(&self, attr: &str) -> Option<Option<Value>> {
        match attr {
            "standard_product_id" => Some(
                self.standard_product_id
                    .as_ref()
                    .map(|id| Value::Element(id.to_element())),
            ),
            "condition" => Some(self.condition.as_ref().map(|condition| {
                Value::Element(
                    Element::new("Condition")
                        .with_child(Element::with_text("ConditionType", condition.clone())),
                )
            })),
            _ => None,
        }
    }

    fn field(&self, attr: &str) -> Option<Value> {
        match attr {
            "sku" => Some(Value::Text(self.sku.clone())),
            "fulfillment_by" => Some(Value::Text(self.fulfillment_by.as_str().to_string())),
            "item_package_quantity" => self.item_package_quantity.map(Value::from),
            "number_of_items" => self.number_of_items.map(Value::from),
            "fulfillment_latency" => self.fulfillment_latency.map(Value::from),
            "launch_date" => self.launch_date.map(Value::DateTime),
            "release_date" => self.release_date.map(Value::DateTime),
            "product_tax_code" => self.product_tax_code.clone().map(Value::Text),
            _ => None,
        }
    }
}

// Generic custom attribute row of a product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAttributeValue {
    pub product_id: ProductId,
    pub attribute_code: String,
    pub value: Value,
}

impl ProductAttributeValue {
    pub fn new(product_id: ProductId, code: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            product_id,
            attribute_code: code.into(),
            value: value.into(),
        }
    }
}
