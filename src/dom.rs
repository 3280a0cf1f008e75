//! The slice of the host document the navigator writes into.
//!
//! Screens never touch a real DOM. They receive a [`Document`] holding the parts a
//! navigation replaces: the title, the `<body>` element's attributes and markup, the
//! *surfaces* (elements addressed by id whose content is swapped) and the resources
//! the new content asked to evaluate. The embedder applies the result to its own tree.

use std::collections::BTreeMap;

/// A single element: its tag, attributes in source order and inner markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub inner_html: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(tag: impl Into<String>, id: impl Into<String>) -> Self {
        let mut el = Self::new(tag);
        el.set_attribute("id", id);
        el
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        match self.attributes.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }
}

/// Removes every attribute from `node`.
pub fn clear_node_attributes(node: &mut Element) {
    node.attributes.clear();
}

/// Copies every attribute of `source` onto `target`, overwriting same-named ones.
pub fn copy_node_attributes(source: &Element, target: &mut Element) {
    for (name, value) in &source.attributes {
        target.set_attribute(name.clone(), value.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Script,
    Style,
}

/// A script or stylesheet the current content needs evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    /// `src`/`href` for external resources
    pub url: Option<String>,
    /// Inline source
    pub inline: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub title: String,
    pub body: Element,
    /// Surfaces keyed by element id
    pub surfaces: BTreeMap<String, Element>,
    /// Resources registered by the last evaluated screen
    pub resources: Vec<Resource>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
            ..Default::default()
        }
    }

    /// Registers a surface that screens may fill.
    pub fn add_surface(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.surfaces.insert(id.clone(), Element::with_id("div", id));
    }

    pub fn surface(&self, id: &str) -> Option<&Element> {
        self.surfaces.get(id)
    }
}
