// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDS documents
//!
//! The root document type: metadata plus an ordered list of
//! specifications, with XML load and save and a whole-document audit
//! entry point.

use crate::error::{IdsError, Result};
use crate::schema::get_schema;
use crate::specification::Specification;
use crate::xml::{self, XmlElement};
use ifc_audit_model::AuditModel;
use std::fs;
use std::path::Path;
use tracing::info;

const IDS_NAMESPACE: &str = "http://standards.buildingsmart.org/IDS";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://standards.buildingsmart.org/IDS http://standards.buildingsmart.org/IDS/ids_05.xsd";

/// Document metadata
///
/// Only the title is mandatory. The author and date setters reject
/// malformed input instead of storing it, so a saved document never
/// carries an invalid address or date.
#[derive(Clone, Debug, PartialEq)]
pub struct IdsInfo {
    /// Document title
    pub title: String,
    /// Copyright statement
    pub copyright: Option<String>,
    /// Document version
    pub version: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    author: Option<String>,
    date: Option<String>,
    /// Intended audit purpose
    pub purpose: Option<String>,
    /// Project milestone the document applies to
    pub milestone: Option<String>,
}

impl Default for IdsInfo {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            copyright: None,
            version: None,
            description: None,
            author: None,
            date: None,
            purpose: None,
            milestone: None,
        }
    }
}

impl IdsInfo {
    /// Author email address, if one was accepted
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Set the author; ignored unless the value looks like an email address
    pub fn set_author(&mut self, author: impl Into<String>) -> bool {
        let author = author.into();
        if author.contains('@') {
            self.author = Some(author);
            true
        } else {
            false
        }
    }

    /// Publication date, if one was accepted
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Set the date; ignored unless the value is a calendar date in
    /// `YYYY-MM-DD` form
    pub fn set_date(&mut self, date: impl Into<String>) -> bool {
        let date = date.into();
        if chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok() {
            self.date = Some(date);
            true
        } else {
            false
        }
    }

    fn parse(element: &XmlElement) -> Self {
        let mut info = IdsInfo::default();
        let text_of = |name: &str| {
            element
                .child(name)
                .and_then(|c| c.text_content())
                .map(str::to_string)
        };
        if let Some(title) = text_of("title") {
            info.title = title;
        }
        info.copyright = text_of("copyright");
        info.version = text_of("version");
        info.description = text_of("description");
        if let Some(author) = text_of("author") {
            info.set_author(author);
        }
        if let Some(date) = text_of("date") {
            info.set_date(date);
        }
        info.purpose = text_of("purpose");
        info.milestone = text_of("milestone");
        info
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("info")
            .with_child(XmlElement::new("title").with_text(&self.title));
        let mut push = |name: &str, value: &Option<String>| {
            if let Some(value) = value {
                if !value.is_empty() {
                    element
                        .children
                        .push(XmlElement::new(name).with_text(value));
                }
            }
        };
        push("copyright", &self.copyright);
        push("version", &self.version);
        push("description", &self.description);
        push("author", &self.author);
        push("date", &self.date);
        push("purpose", &self.purpose);
        push("milestone", &self.milestone);
        element
    }
}

/// A complete audit document
#[derive(Clone, Debug, Default)]
pub struct Ids {
    /// Document metadata
    pub info: IdsInfo,
    /// Audit rules, in document order
    pub specifications: Vec<Specification>,
}

impl Ids {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a parsed XML tree
    pub fn parse(root: &XmlElement) -> Result<Ids> {
        if root.name != "ids" {
            return Err(IdsError::malformed(format!(
                "expected an 'ids' document, found '{}'",
                root.name
            )));
        }
        let info = root.child("info").map(IdsInfo::parse).unwrap_or_default();
        let container = root
            .child("specifications")
            .ok_or_else(|| IdsError::malformed("document without a 'specifications' section"))?;

        let mut specifications = Vec::new();
        for child in container.children_named("specification") {
            specifications.push(Specification::parse(child)?);
        }
        Ok(Ids {
            info,
            specifications,
        })
    }

    /// Serialize to an XML tree
    pub fn to_xml_tree(&self) -> XmlElement {
        let mut container = XmlElement::new("specifications");
        for specification in &self.specifications {
            container.children.push(specification.to_xml());
        }
        XmlElement::new("ids")
            .with_attr("xmlns", IDS_NAMESPACE)
            .with_attr("xmlns:xs", XSD_NAMESPACE)
            .with_attr("xmlns:xsi", XSI_NAMESPACE)
            .with_attr("xsi:schemaLocation", SCHEMA_LOCATION)
            .with_child(self.info.to_xml())
            .with_child(container)
    }

    /// Serialize to an XML string
    pub fn to_string(&self) -> Result<String> {
        xml::write_document(&self.to_xml_tree())
    }

    /// Write to a file, then prove the written form is schema-valid
    ///
    /// # Returns
    /// `true` when the re-read file passes schema validation.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        fs::write(path, self.to_string()?)?;
        let written = fs::read_to_string(path)?;
        let tree = xml::read_document(&written)?;
        Ok(get_schema().validate(&tree).is_ok())
    }

    /// Audit a model against every specification, in document order
    ///
    /// Each specification is reset first, so repeated calls reproduce the
    /// same verdicts.
    pub fn validate(&mut self, model: &dyn AuditModel) {
        info!(
            title = %self.info.title,
            specifications = self.specifications.len(),
            "auditing model"
        );
        for specification in &mut self.specifications {
            specification.reset_status();
            specification.validate(model);
        }
    }
}

/// Load a document from a file
///
/// # Arguments
/// * `path` - File to read
/// * `validate` - Check the document against the IDS schema before parsing
pub fn open(path: impl AsRef<Path>, validate: bool) -> Result<Ids> {
    let source = fs::read_to_string(path.as_ref())?;
    let tree = xml::read_document(&source)?;
    if validate {
        get_schema().validate(&tree)?;
    }
    Ids::parse(&tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::{AttributeFacet, EntityFacet, Facet};
    use crate::restriction::Parameter;
    use crate::specification::AuditStatus;
    use ifc_audit_model::{AttributeValue, MemoryModel};

    fn sample_ids() -> Ids {
        let mut ids = Ids::new();
        ids.info.title = "Wall checks".to_string();
        ids.info.set_author("qa@example.com");
        ids.info.set_date("2024-03-01");

        let mut spec = Specification::new("WallsHaveType");
        spec.ifc_version = vec!["IFC4".to_string()];
        spec.applicability
            .push(Facet::Entity(EntityFacet::new(Parameter::value("IFCWALL"))));
        spec.requirements.push(Facet::Attribute(AttributeFacet::new(
            Parameter::value("Type"),
            None,
        )));
        spec.reset_status();
        ids.specifications.push(spec);
        ids
    }

    #[test]
    fn info_setters_reject_malformed_input() {
        let mut info = IdsInfo::default();
        assert!(!info.set_author("not-an-address"));
        assert!(info.author().is_none());
        assert!(info.set_author("a@b.example"));

        assert!(!info.set_date("March 1st"));
        assert!(!info.set_date("2024-13-40"));
        assert!(info.set_date("2024-03-01"));
    }

    #[test]
    fn string_round_trip_preserves_structure() {
        let ids = sample_ids();
        let text = ids.to_string().unwrap();
        let reparsed = Ids::parse(&xml::read_document(&text).unwrap()).unwrap();

        assert_eq!(reparsed.info.title, "Wall checks");
        assert_eq!(reparsed.info.author(), Some("qa@example.com"));
        assert_eq!(reparsed.specifications.len(), 1);
        assert_eq!(reparsed.specifications[0].name, "WallsHaveType");
        assert_eq!(reparsed.specifications[0].applicability.len(), 1);
        assert_eq!(reparsed.specifications[0].requirements.len(), 1);
    }

    #[test]
    fn empty_info_fields_are_omitted() {
        let mut ids = sample_ids();
        ids.info.description = Some(String::new());
        let tree = ids.to_xml_tree();
        let info = tree.child("info").unwrap();
        assert!(info.child("description").is_none());
        assert!(info.child("title").is_some());
        assert!(info.child("date").is_some());
    }

    #[test]
    fn missing_specifications_section_is_rejected() {
        let tree = xml::read_document("<ids><info><title>T</title></info></ids>").unwrap();
        assert!(Ids::parse(&tree).is_err());
    }

    #[test]
    fn file_round_trip_is_schema_valid() {
        let ids = sample_ids();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walls.ids");

        assert!(ids.to_file(&path).unwrap());

        let reloaded = open(&path, true).unwrap();
        assert_eq!(reloaded.info.title, ids.info.title);
        assert_eq!(reloaded.specifications.len(), ids.specifications.len());
    }

    #[test]
    fn open_without_validation_accepts_nonconforming_markup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loose.ids");
        // No title, which the schema requires but the parser tolerates.
        std::fs::write(
            &path,
            "<ids><info/><specifications/></ids>",
        )
        .unwrap();

        assert!(matches!(
            open(&path, true),
            Err(IdsError::SchemaValidation(_))
        ));
        let ids = open(&path, false).unwrap();
        assert_eq!(ids.info.title, "Untitled");
        assert!(ids.specifications.is_empty());
    }

    #[test]
    fn audit_end_to_end_reports_the_offending_wall() {
        let mut ids = sample_ids();
        ids.specifications[0].min_occurs = Some(1);
        ids.specifications[0].max_occurs = Some(u32::MAX);
        ids.specifications[0].requirements[0] = Facet::Attribute(AttributeFacet::new(
            Parameter::value("Type"),
            Some(Parameter::enumeration(["Internal", "External"])),
        ));

        let mut model = MemoryModel::new("IFC4");
        model.add_element("IfcWall", [("Type", AttributeValue::String("Internal".into()))]);
        model.add_element("IfcWall", [("Type", AttributeValue::String("External".into()))]);
        let bad = model.add_element("IfcWall", [("Type", AttributeValue::String("Unknown".into()))]);

        ids.validate(&model);

        let spec = &ids.specifications[0];
        assert_eq!(spec.status(), AuditStatus::Fail);
        assert_eq!(spec.applicable_entities().len(), 3);
        assert!(spec.failed_entities().contains(&bad));
        let report = &spec.requirement_reports()[0];
        assert_eq!(report.failed_entities, vec![bad]);
        assert!(report.failed_reasons[0].contains("Unknown"));
    }

    #[test]
    fn validate_runs_every_specification_and_is_repeatable() {
        let mut ids = sample_ids();
        let mut model = MemoryModel::new("IFC4");
        model.add_element("IfcWall", [("Type", AttributeValue::String("Internal".into()))]);
        model.add_element("IfcWall", [("Type", AttributeValue::Null)]);

        ids.validate(&model);
        assert_eq!(ids.specifications[0].status(), AuditStatus::Fail);
        assert_eq!(ids.specifications[0].failed_entities().len(), 1);

        ids.validate(&model);
        assert_eq!(ids.specifications[0].status(), AuditStatus::Fail);
        assert_eq!(ids.specifications[0].failed_entities().len(), 1);
    }
}
