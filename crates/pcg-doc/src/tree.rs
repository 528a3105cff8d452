use serde::Serialize;

/// Tag of the document root element.
pub const ROOT_TAG: &str = "precice-configuration";

/// A `key="value"` pair on an element. Attribute order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name.
    pub key: String,
    /// Unescaped attribute value.
    pub value: String,
}

/// A tagged node with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Tag name, possibly with a `<group>:<kind>` prefix.
    pub tag: String,
    /// Attributes in insertion order.
    pub attributes: Vec<Attribute>,
    /// Child elements in insertion order.
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an element without attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Appends a child.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child in place.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends a child unless an equal child is already present.
    pub fn push_unique(&mut self, child: Element) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Value of the named attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.key == key)
            .map(|attribute| attribute.value.as_str())
    }

    /// Returns whether the element has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Children whose tag equals `tag`.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Children whose tag starts with `prefix`.
    pub fn children_prefixed<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |child| child.tag.starts_with(prefix))
    }
}

/// A complete configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Markup version of the declaration line.
    pub version: String,
    /// Text encoding of the declaration line.
    pub encoding: String,
    /// Root element.
    pub root: Element,
}

impl Document {
    /// Wraps a root element with the default declaration.
    pub fn new(root: Element) -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: "UTF-8".to_string(),
            root,
        }
    }
}
