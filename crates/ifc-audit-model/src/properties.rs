// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property set access for model elements

use crate::{AttributeValue, EntityId};
use serde::{Deserialize, Serialize};

/// A single property
///
/// The value stays typed: audits compare property values numerically when
/// bounds are involved, so flattening to a string here would lose
/// information the engine needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Property value
    pub value: AttributeValue,
}

impl Property {
    /// Create a new property
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A property set containing multiple properties
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    /// Property set name (e.g., "Pset_WallCommon")
    pub name: String,
    /// Properties in this set
    pub properties: Vec<Property>,
}

impl PropertySet {
    /// Create a new, empty property set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a property to this set
    pub fn add(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Get a property by name
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Property set reader trait
///
/// Provides access to the property sets linked to an element.
pub trait PropertyReader: Send + Sync {
    /// Get all property sets associated with an element
    ///
    /// # Arguments
    /// * `id` - The element ID to get property sets for
    ///
    /// # Returns
    /// A vector of property sets (empty if none found)
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet>;

    /// Get a property set by name
    fn property_set(&self, id: EntityId, name: &str) -> Option<PropertySet> {
        self.property_sets(id).into_iter().find(|p| p.name == name)
    }

    /// Get a specific property inside a named property set
    ///
    /// # Arguments
    /// * `id` - The element ID to search
    /// * `pset` - The property set name
    /// * `name` - The property name
    fn property(&self, id: EntityId, pset: &str, name: &str) -> Option<Property> {
        self.property_set(id, pset)
            .and_then(|set| set.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pset_lookup() {
        let mut pset = PropertySet::new("Pset_WallCommon");
        pset.add(Property::new("FireRating", AttributeValue::String("F60".into())));
        pset.add(Property::new("IsExternal", AttributeValue::Bool(true)));

        assert_eq!(
            pset.get("FireRating").map(|p| p.value.display()),
            Some("F60".to_string())
        );
        assert!(pset.get("LoadBearing").is_none());
    }
}
