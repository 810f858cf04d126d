// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Audit IDS - Information Delivery Specification compliance engine
//!
//! This crate loads, writes and evaluates IDS audit documents. A document
//! holds an ordered list of specifications; every specification pairs an
//! applicability clause (which elements it governs) with a requirements
//! clause (what must hold for each of them), both composed of typed facets.
//! Running a document against a model yields per-element pass/fail verdicts
//! with human-readable reasons.
//!
//! The engine reads models exclusively through the contract defined in
//! `ifc-audit-model` and never mutates them.
//!
//! # Example
//!
//! ```
//! use ifc_audit_ids::{AuditStatus, Facet, EntityFacet, Ids, Parameter, Specification};
//! use ifc_audit_model::{AttributeValue, MemoryModel};
//!
//! let mut model = MemoryModel::new("IFC4");
//! model.add_element("IfcWall", [("Name", AttributeValue::String("W-01".into()))]);
//!
//! let mut spec = Specification::new("Walls exist");
//! spec.applicability.push(Facet::Entity(EntityFacet::new(Parameter::value("IFCWALL"))));
//!
//! let mut ids = Ids::new();
//! ids.specifications.push(spec);
//! ids.validate(&model);
//!
//! assert_eq!(ids.specifications[0].status(), AuditStatus::Pass);
//! ```

pub mod error;
pub mod facet;
pub mod ids;
pub mod report;
pub mod restriction;
pub mod schema;
pub mod specification;
pub mod xml;

pub use error::{IdsError, Result};
pub use facet::{
    AttributeFacet, ClassificationFacet, EntityFacet, Facet, FacetOutcome, MaterialFacet,
    PartOfFacet, PropertyFacet,
};
pub use ids::{open, Ids, IdsInfo};
pub use report::{AuditReport, RequirementFailure, RequirementReport, SpecificationReport};
pub use restriction::{Constraint, Parameter, Restriction};
pub use schema::{get_schema, IdsSchema, Violation};
pub use specification::{AuditStatus, FacetReport, Specification};
pub use xml::XmlElement;
