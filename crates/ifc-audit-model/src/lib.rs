// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Audit Model - Read-only model contract and shared types for IFC auditing
//!
//! This crate defines the narrow contract an audit engine uses to query a
//! building model. It deliberately exposes no write operations: auditing
//! never mutates the audited model.
//!
//! # Architecture
//!
//! The crate is organized around one entry trait and three reader seams:
//!
//! - [`AuditModel`] - Entry point: schema version plus reader access
//! - [`ElementReader`] - Element lookup and by-class filtering
//! - [`PropertyReader`] - Property set access
//! - [`AssociationReader`] - Classification, material and containment lookups
//!
//! Any model store can back the contract; [`MemoryModel`] is the in-memory
//! reference implementation used for fixtures and tests.
//!
//! # Example
//!
//! ```
//! use ifc_audit_model::{AuditModel, AttributeValue, MemoryModel};
//!
//! let mut model = MemoryModel::new("IFC4");
//! let wall = model.add_element(
//!     "IfcWall",
//!     [("Name", AttributeValue::String("W-01".into()))],
//! );
//!
//! let walls = model.elements().by_class("IFCWALL");
//! assert_eq!(walls.len(), 1);
//! assert_eq!(walls[0].id, wall);
//! ```

pub mod associations;
pub mod elements;
pub mod error;
pub mod memory;
pub mod properties;
pub mod traits;
pub mod types;

// Re-export all public types
pub use associations::*;
pub use elements::*;
pub use error::*;
pub use memory::*;
pub use properties::*;
pub use traits::*;
pub use types::*;
