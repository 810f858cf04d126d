// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element lookup trait

use crate::{EntityId, ModelElement};
use std::sync::Arc;

/// Element lookup and by-class filtering
///
/// Implementations should provide O(1) lookup by ID and an indexed
/// by-class query: the audit engine calls `by_class` once per
/// specification to bound its candidate set before per-element tests.
pub trait ElementReader: Send + Sync {
    /// Get an element by ID
    ///
    /// # Arguments
    /// * `id` - The element ID to look up
    ///
    /// # Returns
    /// `Some(Arc<ModelElement>)` if found, `None` otherwise
    fn get(&self, id: EntityId) -> Option<Arc<ModelElement>>;

    /// Get all elements of a class, matched case-insensitively
    ///
    /// # Arguments
    /// * `class_name` - The IFC class name in any casing
    ///
    /// # Returns
    /// Matching elements in insertion order (empty if none)
    fn by_class(&self, class_name: &str) -> Vec<Arc<ModelElement>>;

    /// Get every element in the model, in insertion order
    fn all(&self) -> Vec<Arc<ModelElement>>;

    /// Count elements of a class
    fn count_by_class(&self, class_name: &str) -> usize {
        self.by_class(class_name).len()
    }

    /// Total element count
    fn len(&self) -> usize {
        self.all().len()
    }

    /// Check whether the model holds no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
