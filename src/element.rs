// Owned XML element tree used for every generated feed fragment
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::MapperError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends an empty child named `name` and hands it back for filling in.
    pub fn sub_element(&mut self, name: impl Into<String>) -> &mut Element {
        let index = self.children.len();
        self.children.push(Element::new(name));
        &mut self.children[index]
    }

    // First direct child with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.name.as_str()).collect()
    }

    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    // Compact rendering, no declaration
    pub fn to_xml_string(&self) -> Result<String, MapperError> {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        into_string(writer.into_inner())
    }

    pub fn to_pretty_xml(&self) -> Result<String, MapperError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_into(&mut writer)?;
        into_string(writer.into_inner())
    }

    /// Renders the element as a standalone document with an XML declaration.
    pub fn to_document(&self, indent: bool) -> Result<String, MapperError> {
        let mut writer = if indent {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| MapperError::Xml(e.to_string()))?;
        self.write_into(&mut writer)?;
        into_string(writer.into_inner())
    }

    pub fn write_into<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), MapperError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| MapperError::Xml(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| MapperError::Xml(e.to_string()))?;
        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| MapperError::Xml(e.to_string()))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| MapperError::Xml(e.to_string()))
    }
}

fn into_string(bytes: Vec<u8>) -> Result<String, MapperError> {
    String::from_utf8(bytes).map_err(|e| MapperError::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_rendering() {
        let elem = Element::new("Product")
            .with_child(Element::with_text("SKU", "ABC-1"))
            .with_child(Element::new("DescriptionData"));

        let xml = elem.to_xml_string().unwrap();
        assert_eq!(
            xml,
            "<Product><SKU>ABC-1</SKU><DescriptionData/></Product>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let elem = Element::with_text("Title", "Salt & Pepper <Mill>");
        let xml = elem.to_xml_string().unwrap();
        assert_eq!(xml, "<Title>Salt &amp; Pepper &lt;Mill&gt;</Title>");
    }

    #[test]
    fn test_attributes_and_declaration() {
        let elem = Element::new("AmazonEnvelope").with_attribute("version", "1");
        let xml = elem.to_document(false).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<AmazonEnvelope version=\"1\"/>"));
    }

    #[test]
    fn test_sub_element_returns_appended_child() {
        let mut product = Element::new("Product");
        product
            .sub_element("DescriptionData")
            .append(Element::with_text("Title", "Kettle"));

        assert_eq!(product.child_names(), vec!["DescriptionData"]);
        let desc = product.find("DescriptionData").unwrap();
        assert_eq!(desc.find("Title").unwrap().text_content(), "Kettle");
    }

    #[test]
    fn test_pretty_rendering_keeps_text_inline() {
        let elem = Element::new("Header").with_child(Element::with_text("DocumentVersion", "1.01"));
        let xml = elem.to_pretty_xml().unwrap();
        assert!(xml.contains("\n  <DocumentVersion>1.01</DocumentVersion>\n"));
    }
}
