// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification, material and containment lookups
//!
//! These cover the relationship edges an audit can test: what an element is
//! classified as, what it is made of, and what larger wholes it is part of.

use crate::{EntityId, ModelElement};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A classification reference attached to an element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRef {
    /// Classification system name (e.g., "Uniclass 2015")
    pub system: String,
    /// Reference identifier within the system (e.g., "EF_25_10_25"),
    /// absent when the element is classified by system only
    pub reference: Option<String>,
}

impl ClassificationRef {
    /// Create a reference with an identifier
    pub fn new(system: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            reference: Some(reference.into()),
        }
    }

    /// Create a system-only reference
    pub fn system_only(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            reference: None,
        }
    }
}

/// Association reader trait
///
/// Provides access to the relationship edges of an element. All methods
/// return empty collections for unknown IDs rather than erroring: an audit
/// treats a missing association as a plain mismatch, not a fault.
pub trait AssociationReader: Send + Sync {
    /// Get all classification references of an element
    fn classifications(&self, id: EntityId) -> Vec<ClassificationRef>;

    /// Get the names of all materials associated with an element
    ///
    /// Layered and constituent materials are flattened to their individual
    /// material names.
    fn materials(&self, id: EntityId) -> Vec<String>;

    /// Get the transitive chain of wholes this element is part of,
    /// nearest container first
    ///
    /// Covers aggregation, nesting and spatial containment alike: an
    /// element contained in a storey reports the storey, then the building,
    /// then the site, then the project.
    fn containers(&self, id: EntityId) -> Vec<Arc<ModelElement>>;
}
