// Product type specific data, built from custom attribute rows
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::catalogue::Product;
use crate::element::Element;
use crate::error::MapperError;
use crate::store::CatalogueStore;
use crate::value::Value;

/// Maps a product's custom attributes onto one MWS product type.
///
/// The fragment produced has the shape
/// `<{base_type}><ProductType><{product_type}>..</..></ProductType></{base_type}>`
/// with one child per mapped attribute row, ordered by XML element name.
pub trait ProductDataMapper: Send + Sync {
    fn product_type(&self) -> &str;

    fn base_type(&self) -> &str;

    // Attribute code -> XML element name
    fn attribute_mapping(&self) -> &BTreeMap<String, String>;

    /// Builds the `ProductData` content for `product`.
    ///
    /// `Ok(None)` means the product gets no `ProductData` element at all.
    /// The default implementation always yields a tree; mappers that skip
    /// some products override this and return `None` for them.
    fn get_product_data(
        &self,
        store: &dyn CatalogueStore,
        product: &Product,
    ) -> Result<Option<Element>, MapperError> {
        let mapping = self.attribute_mapping();
        let codes: Vec<&str> = mapping.keys().map(String::as_str).collect();
        let rows = store.attribute_values(product.id, &codes)?;

        let mut values: Vec<(&str, String, Value)> = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(name) = mapping.get(&row.attribute_code) {
                // Element values order by their markup
                let text = match &row.value {
                    Value::Element(elem) => elem.to_xml_string()?,
                    other => other.to_text(),
                };
                values.push((name.as_str(), text, row.value));
            }
        }
        values.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

        tracing::debug!(
            product_id = product.id,
            product_type = self.product_type(),
            attributes = values.len(),
            "building product data"
        );

        let mut pt_elem = Element::new(self.product_type());
        for (name, text, value) in values {
            match value {
                Value::Element(elem) => pt_elem.append(Element::new(name).with_child(elem)),
                _ => pt_elem.append(Element::with_text(name, text)),
            }
        }

        Ok(Some(
            Element::new(self.base_type()).with_child(Element::new("ProductType").with_child(pt_elem)),
        ))
    }
}

fn mapping_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}

// <CE><ProductType><ConsumerElectronics>
pub struct ConsumerElectronicsMapper {
    mapping: BTreeMap<String, String>,
}

impl ConsumerElectronicsMapper {
    pub fn new() -> Self {
        Self {
            mapping: mapping_of(&[
                ("colour", "Color"),
                ("power_source", "PowerSource"),
                ("screen_size", "ScreenSize"),
                ("voltage", "Voltage"),
                ("wattage", "Wattage"),
            ]),
        }
    }
}

impl Default for ConsumerElectronicsMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductDataMapper for ConsumerElectronicsMapper {
    fn product_type(&self) -> &str {
        "ConsumerElectronics"
    }

    fn base_type(&self) -> &str {
        "CE"
    }

    fn attribute_mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }
}

// <Home><ProductType><Kitchen>
pub struct HomeMapper {
    mapping: BTreeMap<String, String>,
}

impl HomeMapper {
    pub fn new() -> Self {
        Self {
            mapping: mapping_of(&[
                ("colour", "Color"),
                ("material", "Material"),
                ("capacity", "Capacity"),
                ("dishwasher_safe", "IsDishwasherSafe"),
            ]),
        }
    }
}

impl Default for HomeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductDataMapper for HomeMapper {
    fn product_type(&self) -> &str {
        "Kitchen"
    }

    fn base_type(&self) -> &str {
        "Home"
    }

    fn attribute_mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }
}

/// Data mapper declared entirely in the feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDataMapper {
    pub base_type: String,
    pub product_type: String,
    pub attribute_mapping: BTreeMap<String, String>,
}

impl ProductDataMapper for TableDataMapper {
    fn product_type(&self) -> &str {
        &self.product_type
    }

    fn base_type(&self) -> &str {
        &self.base_type
    }

    fn attribute_mapping(&self) -> &BTreeMap<String, String> {
        &self.attribute_mapping
    }
}
