// AmazonEnvelope wrapping for feed documents
use crate::element::Element;
use crate::error::MapperError;

pub const DOCUMENT_VERSION: &str = "1.01";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const ENVELOPE_SCHEMA: &str = "amzn-envelope.xsd";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Product,
    Inventory,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Product => "Product",
            MessageType::Inventory => "Inventory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationType {
    #[default]
    Update,
    Delete,
    PartialUpdate,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Update => "Update",
            OperationType::Delete => "Delete",
            OperationType::PartialUpdate => "PartialUpdate",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedEnvelope {
    pub merchant_identifier: String,
    pub message_type: MessageType,
    // Only emitted for product feeds
    pub purge_and_replace: bool,
    messages: Vec<(OperationType, Element)>,
}

impl FeedEnvelope {
    pub fn new(merchant_identifier: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            merchant_identifier: merchant_identifier.into(),
            message_type,
            purge_and_replace: false,
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, body: Element) {
        self.messages.push((OperationType::Update, body));
    }

    pub fn push_with_operation(&mut self, operation: OperationType, body: Element) {
        self.messages.push((operation, body));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Builds the envelope tree; message IDs are numbered from 1 in push order.
    pub fn to_element(&self) -> Element {
        let mut envelope = Element::new("AmazonEnvelope")
            .with_attribute("xmlns:xsi", XSI_NAMESPACE)
            .with_attribute("xsi:noNamespaceSchemaLocation", ENVELOPE_SCHEMA);

        envelope.append(
            Element::new("Header")
                .with_child(Element::with_text("DocumentVersion", DOCUMENT_VERSION))
                .with_child(Element::with_text(
                    "MerchantIdentifier",
                    self.merchant_identifier.clone(),
                )),
        );
        envelope.append(Element::with_text("MessageType", self.message_type.as_str()));
        if self.message_type == MessageType::Product {
            envelope.append(Element::with_text(
                "PurgeAndReplace",
                self.purge_and_replace.to_string(),
            ));
        }

        for (index, (operation, body)) in self.messages.iter().enumerate() {
            envelope.append(
                Element::new("Message")
                    .with_child(Element::with_text("MessageID", (index + 1).to_string()))
                    .with_child(Element::with_text("OperationType", operation.as_str()))
                    .with_child(body.clone()),
            );
        }
        envelope
    }

    pub fn render(&self) -> Result<String, MapperError> {
        self.to_element().to_document(false)
    }

    pub fn render_pretty(&self) -> Result<String, MapperError> {
        self.to_element().to_document(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_product_envelope() {
        let envelope = FeedEnvelope::new("M_EXAMPLE", MessageType::Product);
        assert!(envelope.is_empty());

        let xml = envelope.render().unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <AmazonEnvelope xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:noNamespaceSchemaLocation=\"amzn-envelope.xsd\">\
             <Header><DocumentVersion>1.01</DocumentVersion><MerchantIdentifier>M_EXAMPLE</MerchantIdentifier></Header>\
             <MessageType>Product</MessageType>\
             <PurgeAndReplace>false</PurgeAndReplace>\
             </AmazonEnvelope>"
        );
    }

    #[test]
    fn test_messages_are_numbered_in_order() {
        let mut envelope = FeedEnvelope::new("M_EXAMPLE", MessageType::Inventory);
        envelope.push(Element::new("Inventory").with_child(Element::with_text("SKU", "A")));
        envelope.push_with_operation(
            OperationType::Delete,
            Element::new("Inventory").with_child(Element::with_text("SKU", "B")),
        );

        let tree = envelope.to_element();
        assert!(tree.find("PurgeAndReplace").is_none());
        let messages: Vec<&Element> = tree
            .children
            .iter()
            .filter(|child| child.name == "Message")
            .collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].find("MessageID").unwrap().text_content(), "1");
        assert_eq!(messages[1].find("MessageID").unwrap().text_content(), "2");
        assert_eq!(messages[1].find("OperationType").unwrap().text_content(), "Delete");
    }

    #[test]
    fn test_pretty_render_has_declaration() {
        let mut envelope = FeedEnvelope::new("M_EXAMPLE", MessageType::Product);
        envelope.purge_and_replace = true;
        let xml = envelope.render_pretty().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<AmazonEnvelope"));
        assert!(xml.contains("<PurgeAndReplace>true</PurgeAndReplace>"));
    }
}
