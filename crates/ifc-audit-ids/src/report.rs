// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Audit reports
//!
//! Flat, serializable snapshots of a finished audit, decoupled from the
//! document types so a report can outlive the `Ids` it came from.

use crate::error::Result;
use crate::ids::Ids;
use crate::specification::AuditStatus;
use serde::Serialize;
use std::fmt::Write as _;

/// Snapshot of one requirement facet after an audit
#[derive(Clone, Debug, Serialize)]
pub struct RequirementReport {
    /// One-line phrasing of the rule
    pub description: String,
    pub status: AuditStatus,
    /// Failed element ids rendered in model notation, with reasons
    pub failures: Vec<RequirementFailure>,
}

/// One element that failed a requirement
#[derive(Clone, Debug, Serialize)]
pub struct RequirementFailure {
    pub entity: String,
    pub reason: String,
}

/// Snapshot of one specification after an audit
#[derive(Clone, Debug, Serialize)]
pub struct SpecificationReport {
    pub name: String,
    pub status: AuditStatus,
    pub applicable: usize,
    pub failed: usize,
    pub requirements: Vec<RequirementReport>,
}

/// Snapshot of a whole audit run
#[derive(Clone, Debug, Serialize)]
pub struct AuditReport {
    pub title: String,
    pub status: AuditStatus,
    pub specifications: Vec<SpecificationReport>,
}

impl AuditReport {
    /// Capture the state of an audited document
    ///
    /// One entry per specification, in document order. The overall status
    /// is `Fail` if any specification failed, `Pass` if at least one
    /// passed and none failed, `Unknown` otherwise. A specification that
    /// was never audited still gets one `Unknown` entry per requirement.
    pub fn new(ids: &Ids) -> Self {
        let specifications: Vec<SpecificationReport> = ids
            .specifications
            .iter()
            .map(|spec| {
                let states = spec.requirement_reports();
                let requirements = spec
                    .requirements
                    .iter()
                    .enumerate()
                    .map(|(index, facet)| RequirementReport {
                        description: facet.describe(),
                        status: states.get(index).map_or(AuditStatus::Unknown, |s| s.status),
                        failures: states
                            .get(index)
                            .map(|state| {
                                state
                                    .failed_entities
                                    .iter()
                                    .zip(&state.failed_reasons)
                                    .map(|(id, reason)| RequirementFailure {
                                        entity: id.to_string(),
                                        reason: reason.clone(),
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .collect();
                SpecificationReport {
                    name: spec.name.clone(),
                    status: spec.status(),
                    applicable: spec.applicable_entities().len(),
                    failed: spec.failed_entities().len(),
                    requirements,
                }
            })
            .collect();

        let status = if specifications.iter().any(|s| s.status == AuditStatus::Fail) {
            AuditStatus::Fail
        } else if specifications.iter().any(|s| s.status == AuditStatus::Pass) {
            AuditStatus::Pass
        } else {
            AuditStatus::Unknown
        };

        Self {
            title: ids.info.title.clone(),
            status,
            specifications,
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as console-style text, one line per specification and one
    /// indented line per failure
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", tag(self.status), self.title);
        for spec in &self.specifications {
            let _ = writeln!(
                out,
                "{} {} ({} applicable, {} failed)",
                tag(spec.status),
                spec.name,
                spec.applicable,
                spec.failed
            );
            for requirement in &spec.requirements {
                for failure in &requirement.failures {
                    let _ = writeln!(out, "    {} {}", failure.entity, failure.reason);
                }
            }
        }
        out
    }
}

fn tag(status: AuditStatus) -> &'static str {
    match status {
        AuditStatus::Pass => "[PASS]",
        AuditStatus::Fail => "[FAIL]",
        AuditStatus::Unknown => "[SKIP]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::{AttributeFacet, EntityFacet, Facet};
    use crate::restriction::Parameter;
    use crate::specification::Specification;
    use ifc_audit_model::{AttributeValue, MemoryModel};

    fn audited_ids() -> Ids {
        let mut ids = Ids::new();
        ids.info.title = "Wall checks".to_string();

        let mut spec = Specification::new("WallsHaveType");
        spec.ifc_version = vec!["IFC4".to_string()];
        spec.max_occurs = Some(u32::MAX);
        spec.applicability
            .push(Facet::Entity(EntityFacet::new(Parameter::value("IFCWALL"))));
        spec.requirements.push(Facet::Attribute(AttributeFacet::new(
            Parameter::value("Type"),
            Some(Parameter::enumeration(["Internal", "External"])),
        )));
        ids.specifications.push(spec);

        let mut slabs = Specification::new("SlabsExist");
        slabs.ifc_version = vec!["IFC4".to_string()];
        slabs
            .applicability
            .push(Facet::Entity(EntityFacet::new(Parameter::value("IFCSLAB"))));
        ids.specifications.push(slabs);

        let mut model = MemoryModel::new("IFC4");
        model.add_element("IfcWall", [("Type", AttributeValue::String("Internal".into()))]);
        model.add_element("IfcWall", [("Type", AttributeValue::String("Unknown".into()))]);
        model.add_element("IfcSlab", [] as [(&str, AttributeValue); 0]);
        ids.validate(&model);
        ids
    }

    #[test]
    fn report_mirrors_specification_state() {
        let ids = audited_ids();
        let report = AuditReport::new(&ids);

        assert_eq!(report.status, AuditStatus::Fail);
        assert_eq!(report.specifications.len(), 2);
        let spec = &report.specifications[0];
        assert_eq!(spec.applicable, 2);
        assert_eq!(spec.failed, 1);
        assert_eq!(spec.requirements.len(), 1);
        assert_eq!(spec.requirements[0].failures.len(), 1);
        assert!(spec.requirements[0].failures[0].reason.contains("Unknown"));
    }

    #[test]
    fn specifications_keep_declared_order() {
        let report = AuditReport::new(&audited_ids());
        let names: Vec<&str> = report
            .specifications
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["WallsHaveType", "SlabsExist"]);
        assert_eq!(report.specifications[1].status, AuditStatus::Pass);
    }

    #[test]
    fn unaudited_document_reports_unknown_requirements() {
        let mut ids = Ids::new();
        let mut spec = Specification::new("NeverRun");
        spec.requirements.push(Facet::Attribute(AttributeFacet::new(
            Parameter::value("Name"),
            None,
        )));
        ids.specifications.push(spec);

        let report = AuditReport::new(&ids);
        assert_eq!(report.status, AuditStatus::Unknown);
        let spec = &report.specifications[0];
        assert_eq!(spec.requirements.len(), 1);
        assert_eq!(spec.requirements[0].status, AuditStatus::Unknown);
        assert!(spec.requirements[0].failures.is_empty());
    }

    #[test]
    fn text_rendering_tags_every_line() {
        let report = AuditReport::new(&audited_ids());
        let text = report.to_text();
        assert!(text.contains("[FAIL] Wall checks"));
        assert!(text.contains("[FAIL] WallsHaveType (2 applicable, 1 failed)"));
        assert!(text.contains("#2"));
    }

    #[test]
    fn json_rendering_is_lowercase_statuses() {
        let report = AuditReport::new(&audited_ids());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"status\": \"fail\""));
        assert!(json.contains("\"WallsHaveType\""));
    }
}
