// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types shared between model stores and the audit engine
//!
//! Elements carry their attributes by name rather than by position: audit
//! rules address attributes by name, and positional layouts differ between
//! schema versions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe element identifier
///
/// Wraps the raw numeric ID a model store assigns (e.g., #123 becomes
/// `EntityId(123)`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Canonical IFC class name
///
/// IFC class names are case-insensitive in source files; the canonical form
/// is uppercase (`IfcWall` becomes `IFCWALL`). The set of classes is open:
/// an audit must be able to match classes introduced after it was written,
/// so this is a newtype over the canonical string, not a closed enum.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct IfcClass(String);

impl IfcClass {
    /// Create a class from any casing of the name
    pub fn new(name: impl AsRef<str>) -> Self {
        IfcClass(name.as_ref().to_uppercase())
    }

    /// The canonical (uppercase) class name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against an arbitrary name
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for IfcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IfcClass {
    fn from(name: &str) -> Self {
        IfcClass::new(name)
    }
}

/// Decoded attribute value
///
/// Represents any value that can appear in an element's attribute list or
/// in a property.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Null / unset value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Enumeration value (e.g., `.SOLIDWALL.` stored as `SOLIDWALL`)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as enum string
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// True for values an audit treats as "present": non-null and, for
    /// strings and lists, non-empty
    pub fn is_populated(&self) -> bool {
        match self {
            AttributeValue::Null => false,
            AttributeValue::String(s) => !s.is_empty(),
            AttributeValue::List(list) => !list.is_empty(),
            _ => true,
        }
    }

    /// Display form used in audit failure reasons
    pub fn display(&self) -> String {
        match self {
            AttributeValue::Null => "<null>".to_string(),
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Integer(i) => i.to_string(),
            AttributeValue::Float(f) => {
                let s = format!("{f}");
                s
            }
            AttributeValue::String(s) => s.clone(),
            AttributeValue::Enum(e) => e.clone(),
            AttributeValue::List(list) => {
                let parts: Vec<String> = list.iter().map(|v| v.display()).collect();
                parts.join(", ")
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A model element as seen by the audit engine
///
/// Carries the element's class and its named attributes. Property sets,
/// classifications and materials are reached through the reader traits,
/// not stored on the element.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelElement {
    /// Element ID
    pub id: EntityId,
    /// IFC class
    pub class: IfcClass,
    /// Named attribute values in declaration order
    pub attributes: Vec<(String, AttributeValue)>,
}

impl ModelElement {
    /// Create an element from an iterator of named attributes
    pub fn new(
        id: EntityId,
        class: impl Into<IfcClass>,
        attributes: impl IntoIterator<Item = (String, AttributeValue)>,
    ) -> Self {
        Self {
            id,
            class: class.into(),
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Get an attribute value by name (case-sensitive, IFC attribute names
    /// are fixed per schema)
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Attribute names in declaration order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(n, _)| n.as_str())
    }

    /// Shortcut for the `PredefinedType` attribute common to typed elements
    pub fn predefined_type(&self) -> Option<&str> {
        match self.attribute("PredefinedType") {
            Some(AttributeValue::Enum(s)) => Some(s),
            Some(AttributeValue::String(s)) => Some(s),
            _ => None,
        }
    }
}
