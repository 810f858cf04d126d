// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Specifications
//!
//! A specification pairs an applicability clause (which elements are in
//! scope) with a requirements clause (what those elements must satisfy)
//! and carries the audit state produced by running it against a model.
//! Audit state lives here, not on the facets, so facets stay immutable
//! and shareable between runs.

use crate::error::{IdsError, Result};
use crate::facet::Facet;
use crate::xml::XmlElement;
use ifc_audit_model::{AuditModel, EntityId};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Verdict of one specification or one requirement facet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Not yet audited, or skipped because the model schema does not match
    #[default]
    Unknown,
    Pass,
    Fail,
}

/// Per-run audit state for one requirement facet
///
/// The failure lists are parallel: `failed_reasons[i]` explains why
/// `failed_entities[i]` failed. Order follows evaluation order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacetReport {
    /// Verdict for the most recently evaluated element
    pub status: AuditStatus,
    /// Elements that failed this facet, in evaluation order
    pub failed_entities: Vec<EntityId>,
    /// Reason per failed element
    pub failed_reasons: Vec<String>,
}

/// One audit rule: applicability, requirements, and the state of the last
/// run
#[derive(Clone, Debug)]
pub struct Specification {
    /// Human-readable rule name
    pub name: String,
    /// Optional stable identifier
    pub identifier: Option<String>,
    /// Optional prose description
    pub description: Option<String>,
    /// Optional authoring guidance
    pub instructions: Option<String>,
    /// Minimum number of applicable elements, `None` meaning at least one
    pub min_occurs: Option<u32>,
    /// Maximum number of applicable elements, `u32::MAX` meaning unbounded
    pub max_occurs: Option<u32>,
    /// Schema versions this rule applies to
    pub ifc_version: Vec<String>,
    /// Facets selecting the elements in scope
    pub applicability: Vec<Facet>,
    /// Facets every in-scope element must satisfy
    pub requirements: Vec<Facet>,

    status: AuditStatus,
    applicable_entities: Vec<EntityId>,
    failed_entities: FxHashSet<EntityId>,
    requirement_reports: Vec<FacetReport>,
}

impl Specification {
    /// Create an empty specification with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            description: None,
            instructions: None,
            min_occurs: None,
            max_occurs: None,
            ifc_version: vec!["IFC2X3".to_string(), "IFC4".to_string()],
            applicability: Vec::new(),
            requirements: Vec::new(),
            status: AuditStatus::Unknown,
            applicable_entities: Vec::new(),
            failed_entities: FxHashSet::default(),
            requirement_reports: Vec::new(),
        }
    }

    /// Verdict of the last run
    pub fn status(&self) -> AuditStatus {
        self.status
    }

    /// Elements that matched the applicability clause in the last run
    pub fn applicable_entities(&self) -> &[EntityId] {
        &self.applicable_entities
    }

    /// Elements that failed at least one requirement in the last run
    pub fn failed_entities(&self) -> &FxHashSet<EntityId> {
        &self.failed_entities
    }

    /// Per-requirement state of the last run, parallel to `requirements`
    pub fn requirement_reports(&self) -> &[FacetReport] {
        &self.requirement_reports
    }

    /// Clear all audit state and rebuild one empty report per requirement
    pub fn reset_status(&mut self) {
        self.status = AuditStatus::Unknown;
        self.applicable_entities.clear();
        self.failed_entities.clear();
        self.requirement_reports =
            vec![FacetReport::default(); self.requirements.len()];
    }

    /// Run this specification against a model
    ///
    /// Does not reset first; callers re-running a specification in
    /// isolation call [`reset_status`](Self::reset_status) themselves.
    pub fn validate(&mut self, model: &dyn AuditModel) {
        if self.requirement_reports.len() != self.requirements.len() {
            self.requirement_reports =
                vec![FacetReport::default(); self.requirements.len()];
        }

        let schema_version = model.schema_version();
        if !self.ifc_version.iter().any(|v| v == schema_version) {
            debug!(
                specification = %self.name,
                schema = schema_version,
                "skipped, schema version out of scope"
            );
            return;
        }

        let mut candidates = Vec::new();
        for facet in &self.applicability {
            candidates = facet.filter(model, candidates);
        }

        let mut applicable = Vec::new();
        for element in candidates {
            let is_applicable = self
                .applicability
                .iter()
                .filter(|facet| !facet.is_entity())
                .all(|facet| facet.evaluate(model, &element).passed());
            if is_applicable {
                applicable.push(Arc::clone(&element));
            }
        }

        for element in &applicable {
            self.applicable_entities.push(element.id);
            for (facet, report) in
                self.requirements.iter().zip(&mut self.requirement_reports)
            {
                let outcome = facet.evaluate(model, element);
                report.status = if outcome.passed() {
                    AuditStatus::Pass
                } else {
                    AuditStatus::Fail
                };
                if !outcome.passed() {
                    self.failed_entities.insert(element.id);
                    report.failed_entities.push(element.id);
                    report.failed_reasons.push(outcome.into_reason());
                }
            }
        }

        self.status = if !self.failed_entities.is_empty() {
            AuditStatus::Fail
        } else if self.min_occurs != Some(0) && applicable.is_empty() {
            for report in &mut self.requirement_reports {
                report.status = AuditStatus::Fail;
            }
            AuditStatus::Fail
        } else if applicable.len() as u64 > u64::from(self.effective_max_occurs()) {
            AuditStatus::Fail
        } else {
            AuditStatus::Pass
        };

        debug!(
            specification = %self.name,
            applicable = applicable.len(),
            failed = self.failed_entities.len(),
            status = ?self.status,
            "audited"
        );
    }

    fn effective_max_occurs(&self) -> u32 {
        match self.max_occurs {
            Some(0) | None => 1,
            Some(n) => n,
        }
    }

    /// Parse a `specification` element
    pub fn parse(element: &XmlElement) -> Result<Self> {
        let mut spec = Specification::new(
            element.attr("name").filter(|s| !s.is_empty()).unwrap_or("Unnamed"),
        );
        spec.identifier = optional_attr(element, "identifier");
        spec.description = optional_attr(element, "description");
        spec.instructions = optional_attr(element, "instructions");

        if let Some(versions) = element.attr("ifcVersion") {
            let versions: Vec<String> =
                versions.split_whitespace().map(str::to_string).collect();
            if !versions.is_empty() {
                spec.ifc_version = versions;
            }
        }

        if let Some(raw) = element.attr("minOccurs") {
            spec.min_occurs = Some(raw.parse().map_err(|_| {
                IdsError::malformed(format!("invalid minOccurs '{raw}'"))
            })?);
        }
        if let Some(raw) = element.attr("maxOccurs") {
            spec.max_occurs = Some(if raw == "unbounded" {
                u32::MAX
            } else {
                raw.parse().map_err(|_| {
                    IdsError::malformed(format!("invalid maxOccurs '{raw}'"))
                })?
            });
        }

        if let Some(clause) = element.child("applicability") {
            spec.applicability = parse_clause(clause)?;
        }
        if let Some(clause) = element.child("requirements") {
            spec.requirements = parse_clause(clause)?;
        }

        spec.reset_status();
        Ok(spec)
    }

    /// Serialize to a `specification` element
    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("specification")
            .with_attr("name", &self.name)
            .with_attr("ifcVersion", self.ifc_version.join(" "));
        push_optional_attr(&mut element, "identifier", &self.identifier);
        push_optional_attr(&mut element, "description", &self.description);
        push_optional_attr(&mut element, "instructions", &self.instructions);

        // A zero minOccurs is the default reading of an absent attribute
        // on re-parse paths downstream tools use, so it is not written
        // back out.
        if let Some(min) = self.min_occurs {
            if min != 0 {
                element
                    .attributes
                    .push(("minOccurs".to_string(), min.to_string()));
            }
        }
        if let Some(max) = self.max_occurs {
            let rendered = if max == u32::MAX {
                "unbounded".to_string()
            } else {
                max.to_string()
            };
            element.attributes.push(("maxOccurs".to_string(), rendered));
        }

        let mut applicability = XmlElement::new("applicability");
        for facet in &self.applicability {
            applicability.children.push(facet.to_xml());
        }
        let mut requirements = XmlElement::new("requirements");
        for facet in &self.requirements {
            requirements.children.push(facet.to_xml());
        }
        element.with_child(applicability).with_child(requirements)
    }
}

fn parse_clause(clause: &XmlElement) -> Result<Vec<Facet>> {
    let mut facets = Vec::new();
    for child in &clause.children {
        if let Some(facet) = Facet::parse(child)? {
            facets.push(facet);
        }
    }
    Ok(facets)
}

fn optional_attr(element: &XmlElement, name: &str) -> Option<String> {
    element
        .attr(name)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn push_optional_attr(element: &mut XmlElement, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            element.attributes.push((name.to_string(), value.clone()));
        }
    }
}
