// Attribute value resolution shared by all product mappers
use once_cell::sync::Lazy;
use regex::Regex;

use crate::element::Element;
use crate::value::Value;

/// Something attribute values can be read from by snake_case name.
///
/// A source may define computed accessors that take precedence over its
/// plain stored fields. When an accessor exists for a name its result is
/// final, even when it yields nothing.
pub trait AttributeSource {
    fn accessor(&self, _attr: &str) -> Option<Option<Value>> {
        None
    }

    fn field(&self, attr: &str) -> Option<Value>;
}

// Accessor first, plain field otherwise. Missing values are not validated.
pub fn value_from<S: AttributeSource + ?Sized>(source: &S, attr: &str) -> Option<Value> {
    match source.accessor(attr) {
        Some(computed) => computed,
        None => source.field(attr),
    }
}

/// Converts a CamelCase XML element name into the snake_case attribute
/// name used on catalogue records, e.g. `LaunchDate` to `launch_date`.
pub fn convert_camel_case(name: &str) -> String {
    let words = WORD_START.replace_all(name, "${1}_${2}");
    CAPITAL_AFTER_LOWER
        .replace_all(&words, "${1}_${2}")
        .to_lowercase()
}

// Underscore before a capitalised word
static WORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid word start pattern"));

// Underscore between a lowercase letter or digit and a capital
static CAPITAL_AFTER_LOWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid capital pattern"));

// Lookup scope a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    AmazonProfile,
    Product,
    Mapper,
}

/// Ordered list of sources tried one after another; the first truthy value
/// wins.
pub struct ResolutionChain<'a> {
    sources: Vec<(Scope, &'a dyn AttributeSource)>,
}

impl<'a> ResolutionChain<'a> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn then(mut self, scope: Scope, source: &'a dyn AttributeSource) -> Self {
        self.sources.push((scope, source));
        self
    }

    pub fn resolve(&self, attr: &str) -> Option<(Scope, Value)> {
        self.sources.iter().find_map(|(scope, source)| {
            value_from(*source, attr)
                .filter(Value::is_truthy)
                .map(|value| (*scope, value))
        })
    }

    /// Builds the XML element for `attr_name`, or nothing when no source
    /// holds a truthy value for it (the attribute is then treated as optional).
    pub fn get_value_element(&self, attr_name: &str) -> Option<Element> {
        let attr = convert_camel_case(attr_name);
        let (scope, value) = self.resolve(&attr)?;
        tracing::trace!(attr = attr_name, ?scope, "resolved attribute");

        match value {
            Value::Element(elem) => Some(elem),
            Value::Text(text) => Some(Element::with_text(attr_name, text)),
            other => Some(Element::with_text(
                attr_name,
                crate::value::serialise(Some(&other)),
            )),
        }
    }
}

impl Default for ResolutionChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}
