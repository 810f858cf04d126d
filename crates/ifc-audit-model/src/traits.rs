// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The audit read contract
//!
//! An audit engine only ever needs read access to the model: which elements
//! exist, what their attributes are, and what property sets,
//! classifications, materials and containers they are linked to.

use crate::{AssociationReader, ElementReader, PropertyReader};

/// Entry point for auditing a model
///
/// The model is thread-safe (`Send + Sync`) so independent audits may run
/// against it from different threads. The contract carries no write
/// operations at all.
///
/// # Example
///
/// ```ignore
/// use ifc_audit_model::AuditModel;
///
/// fn count_walls(model: &dyn AuditModel) -> usize {
///     model.elements().by_class("IFCWALL").len()
/// }
/// ```
pub trait AuditModel: Send + Sync {
    /// Declared schema version of the model (e.g., "IFC2X3", "IFC4")
    fn schema_version(&self) -> &str;

    /// Get the element reader for lookups and by-class filtering
    fn elements(&self) -> &dyn ElementReader;

    /// Get the property reader for property set access
    fn properties(&self) -> &dyn PropertyReader;

    /// Get the association reader for classification, material and
    /// containment lookups
    fn associations(&self) -> &dyn AssociationReader;
}
