//! Database schema and the required decoration attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::DecorError;

/// Descriptor kind of the attribute holding a record's icon.
pub const ICON_KIND: &str = "page_icon";

/// Descriptor kind of the attribute holding a record's cover.
pub const COVER_KIND: &str = "page_cover";

/// Describes one attribute the remote database reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,

    /// Source-specific type name (`"title"`, `"page_icon"`, ...).
    pub kind: String,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Attribute name -> descriptor, as returned by `retrieve_schema`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    properties: BTreeMap<String, PropertyDescriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn insert(&mut self, descriptor: PropertyDescriptor) {
        self.properties.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Names are compared exactly; no case folding.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<PropertyDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = PropertyDescriptor>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for descriptor in iter {
            schema.insert(descriptor);
        }
        schema
    }
}

/// Names under which the source exposes the two decoration attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeNames {
    pub icon: String,
    pub cover: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            icon: "icon".to_string(),
            cover: "cover".to_string(),
        }
    }
}

impl AttributeNames {
    pub fn new(icon: impl Into<String>, cover: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            cover: cover.into(),
        }
    }

    /// Both names must be present in `schema` and point at the icon / cover
    /// attributes, the ones eligibility reads.
    ///
    /// A name that resolves to some other property (`Name`, `Tags`, ...) is an
    /// `AttributeKind` error rather than a silent match.
    pub fn require_in(&self, schema: &Schema) -> Result<(), DecorError> {
        let missing: Vec<String> = [&self.icon, &self.cover]
            .into_iter()
            .filter(|name| !schema.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(DecorError::MissingAttributes(missing));
        }

        for (name, expected) in [(&self.icon, ICON_KIND), (&self.cover, COVER_KIND)] {
            let Some(descriptor) = schema.get(name) else {
                continue;
            };
            if descriptor.kind != expected {
                return Err(DecorError::AttributeKind {
                    name: name.clone(),
                    expected: expected.to_string(),
                    found: descriptor.kind.clone(),
                });
            }
        }
        Ok(())
    }
}
