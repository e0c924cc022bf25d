// Maps catalogue products onto Amazon MWS product and inventory feed XML

pub mod catalogue;
pub mod config;
pub mod data_mapper;
pub mod element;
pub mod error;
pub mod feed;
pub mod loader;
pub mod mapper;
pub mod resolver;
pub mod store;
pub mod value;

// Re-export key types for convenience
pub use catalogue::{AmazonProfile, Product, ProductAttributeValue, ProductClass};
pub use config::{DataMapperSpec, FeedConfig};
pub use data_mapper::{ProductDataMapper, TableDataMapper};
pub use element::Element;
pub use error::MapperError;
pub use feed::{FeedEnvelope, MessageType};
pub use loader::{MapperClass, MapperLoader};
pub use mapper::{BaseProductMapper, InventoryProductMapper, MapperAccessor, ProductMapper};
pub use resolver::{convert_camel_case, AttributeSource};
pub use store::{CatalogueStore, InMemoryCatalogue};
pub use value::{serialise, Value};
