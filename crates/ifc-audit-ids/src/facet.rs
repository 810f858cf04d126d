// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facets
//!
//! A facet is one typed rule over a model element. The set of facet kinds
//! is closed, so the engine models it as a sum type and dispatches by
//! pattern match; the compiler checks exhaustiveness instead of a runtime
//! name lookup. Unknown facet element names in a document are a parse-time
//! concern and are skipped by the clause parser.

use crate::error::{IdsError, Result};
use crate::restriction::Parameter;
use crate::xml::XmlElement;
use ifc_audit_model::{AuditModel, ModelElement};
use std::sync::Arc;

/// Outcome of evaluating one facet against one element
///
/// A failure carries the human-readable reason that ends up in the audit
/// report; it is data, never an error.
#[derive(Clone, Debug, PartialEq)]
pub struct FacetOutcome {
    passed: bool,
    reason: Option<String>,
}

impl FacetOutcome {
    /// A passing outcome
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
        }
    }

    /// A failing outcome with its reason
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason.into()),
        }
    }

    /// Whether the element satisfied the facet
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Consume into the reason string, with a generic fallback
    pub fn into_reason(self) -> String {
        self.reason
            .unwrap_or_else(|| "requirement not met".to_string())
    }
}

/// Entity-type facet: matches the element's IFC class and, optionally, its
/// predefined type. The only facet kind that narrows the candidate set
/// during filtering.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityFacet {
    /// IFC class name to match
    pub name: Parameter,
    /// Optional predefined type to match
    pub predefined_type: Option<Parameter>,
    /// Free-text guidance carried through serialization
    pub instructions: Option<String>,
}

impl EntityFacet {
    /// Create an entity facet matching a class name
    pub fn new(name: Parameter) -> Self {
        Self {
            name,
            predefined_type: None,
            instructions: None,
        }
    }

    /// Coarse pre-filter over the whole model
    ///
    /// A literal class name uses the model's class index; a restriction
    /// scans all elements. The incoming candidate set is replaced, not
    /// intersected: entity facets define the search space.
    pub fn filter(
        &self,
        model: &dyn AuditModel,
        _candidates: Vec<Arc<ModelElement>>,
    ) -> Vec<Arc<ModelElement>> {
        let mut matched = match &self.name {
            Parameter::Value(class_name) => model.elements().by_class(class_name),
            Parameter::Restriction(_) => model
                .elements()
                .all()
                .into_iter()
                .filter(|e| self.name.matches_ignore_case(e.class.as_str()))
                .collect(),
        };
        if let Some(predefined) = &self.predefined_type {
            matched.retain(|e| {
                e.predefined_type()
                    .is_some_and(|p| predefined.matches_ignore_case(p))
            });
        }
        matched
    }

    fn evaluate(&self, element: &ModelElement) -> FacetOutcome {
        if !self.name.matches_ignore_case(element.class.as_str()) {
            return FacetOutcome::fail(format!(
                "is an {}, not {}",
                element.class,
                self.name.describe()
            ));
        }
        if let Some(predefined) = &self.predefined_type {
            return match element.predefined_type() {
                Some(actual) if predefined.matches_ignore_case(actual) => FacetOutcome::pass(),
                Some(actual) => FacetOutcome::fail(format!(
                    "has the predefined type {}, which is not {}",
                    actual,
                    predefined.describe()
                )),
                None => FacetOutcome::fail("has no predefined type".to_string()),
            };
        }
        FacetOutcome::pass()
    }

    fn describe(&self) -> String {
        match &self.predefined_type {
            Some(predefined) => format!(
                "an element of class {} with predefined type {}",
                self.name.describe(),
                predefined.describe()
            ),
            None => format!("an element of class {}", self.name.describe()),
        }
    }

    fn parse(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            name: Parameter::parse(require_child(element, "name")?)?,
            predefined_type: element
                .child("predefinedType")
                .map(Parameter::parse)
                .transpose()?,
            instructions: instructions_of(element),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("entity").with_child(self.name.to_xml("name"));
        if let Some(predefined) = &self.predefined_type {
            element.children.push(predefined.to_xml("predefinedType"));
        }
        push_instructions(&mut element, &self.instructions);
        element
    }
}

/// Attribute facet: the element must carry a populated attribute whose
/// name matches, and whose value satisfies the value parameter if one is
/// given.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeFacet {
    /// Attribute name to match
    pub name: Parameter,
    /// Optional constraint on the attribute value
    pub value: Option<Parameter>,
    /// Free-text guidance carried through serialization
    pub instructions: Option<String>,
}

impl AttributeFacet {
    /// Create an attribute facet
    pub fn new(name: Parameter, value: Option<Parameter>) -> Self {
        Self {
            name,
            value,
            instructions: None,
        }
    }

    fn evaluate(&self, element: &ModelElement) -> FacetOutcome {
        let matched: Vec<_> = element
            .attributes
            .iter()
            .filter(|(name, _)| self.name.matches(name))
            .collect();

        if matched.is_empty() {
            return FacetOutcome::fail(format!(
                "does not have an attribute named {}",
                self.name.describe()
            ));
        }

        for (name, value) in matched {
            if !value.is_populated() {
                return FacetOutcome::fail(format!("the attribute {name} is empty"));
            }
            if let Some(expected) = &self.value {
                let actual = value.display();
                if !expected.matches(&actual) {
                    return FacetOutcome::fail(format!(
                        "the attribute {} has the value {}, which is not {}",
                        name,
                        actual,
                        expected.describe()
                    ));
                }
            }
        }
        FacetOutcome::pass()
    }

    fn describe(&self) -> String {
        match &self.value {
            Some(value) => format!(
                "an attribute {} with value {}",
                self.name.describe(),
                value.describe()
            ),
            None => format!("an attribute {}", self.name.describe()),
        }
    }

    fn parse(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            name: Parameter::parse(require_child(element, "name")?)?,
            value: element.child("value").map(Parameter::parse).transpose()?,
            instructions: instructions_of(element),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("attribute").with_child(self.name.to_xml("name"));
        if let Some(value) = &self.value {
            element.children.push(value.to_xml("value"));
        }
        push_instructions(&mut element, &self.instructions);
        element
    }
}

/// Classification facet: some classification reference on the element must
/// satisfy both the system and the value parameters.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ClassificationFacet {
    /// Optional constraint on the classification system name
    pub system: Option<Parameter>,
    /// Optional constraint on the reference identifier
    pub value: Option<Parameter>,
    /// Free-text guidance carried through serialization
    pub instructions: Option<String>,
}

impl ClassificationFacet {
    /// Create a classification facet
    pub fn new(system: Option<Parameter>, value: Option<Parameter>) -> Self {
        Self {
            system,
            value,
            instructions: None,
        }
    }

    fn evaluate(&self, model: &dyn AuditModel, element: &ModelElement) -> FacetOutcome {
        let references = model.associations().classifications(element.id);
        if references.is_empty() {
            return FacetOutcome::fail("has no classification reference");
        }

        let satisfied = references.iter().any(|r| {
            let system_ok = self
                .system
                .as_ref()
                .is_none_or(|system| system.matches(&r.system));
            let value_ok = self.value.as_ref().is_none_or(|value| {
                r.reference
                    .as_deref()
                    .is_some_and(|reference| value.matches(reference))
            });
            system_ok && value_ok
        });

        if satisfied {
            FacetOutcome::pass()
        } else {
            let found: Vec<String> = references
                .iter()
                .map(|r| match &r.reference {
                    Some(reference) => format!("{} {}", r.system, reference),
                    None => r.system.clone(),
                })
                .collect();
            FacetOutcome::fail(format!(
                "is classified as [{}], which does not satisfy {}",
                found.join(", "),
                self.describe()
            ))
        }
    }

    fn describe(&self) -> String {
        match (&self.system, &self.value) {
            (Some(system), Some(value)) => format!(
                "a classification reference {} in system {}",
                value.describe(),
                system.describe()
            ),
            (Some(system), None) => {
                format!("a classification in system {}", system.describe())
            }
            (None, Some(value)) => format!("a classification reference {}", value.describe()),
            (None, None) => "any classification".to_string(),
        }
    }

    fn parse(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            system: element.child("system").map(Parameter::parse).transpose()?,
            value: element.child("value").map(Parameter::parse).transpose()?,
            instructions: instructions_of(element),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("classification");
        if let Some(system) = &self.system {
            element.children.push(system.to_xml("system"));
        }
        if let Some(value) = &self.value {
            element.children.push(value.to_xml("value"));
        }
        push_instructions(&mut element, &self.instructions);
        element
    }
}

/// Property facet: a property set matching `property_set` must contain a
/// populated property matching `name`, satisfying `value` if given.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyFacet {
    /// Property set name to match
    pub property_set: Parameter,
    /// Property name to match
    pub name: Parameter,
    /// Optional constraint on the property value
    pub value: Option<Parameter>,
    /// Free-text guidance carried through serialization
    pub instructions: Option<String>,
}

impl PropertyFacet {
    /// Create a property facet
    pub fn new(property_set: Parameter, name: Parameter, value: Option<Parameter>) -> Self {
        Self {
            property_set,
            name,
            value,
            instructions: None,
        }
    }

    fn evaluate(&self, model: &dyn AuditModel, element: &ModelElement) -> FacetOutcome {
        let sets: Vec<_> = model
            .properties()
            .property_sets(element.id)
            .into_iter()
            .filter(|set| self.property_set.matches(&set.name))
            .collect();

        if sets.is_empty() {
            return FacetOutcome::fail(format!(
                "does not have a property set named {}",
                self.property_set.describe()
            ));
        }

        let mut matched = Vec::new();
        for set in &sets {
            for property in &set.properties {
                if self.name.matches(&property.name) {
                    matched.push((set.name.clone(), property.clone()));
                }
            }
        }

        if matched.is_empty() {
            return FacetOutcome::fail(format!(
                "does not have a property {} in the set {}",
                self.name.describe(),
                self.property_set.describe()
            ));
        }

        for (set_name, property) in matched {
            if !property.value.is_populated() {
                return FacetOutcome::fail(format!(
                    "the property {} in {} is empty",
                    property.name, set_name
                ));
            }
            if let Some(expected) = &self.value {
                let actual = property.value.display();
                if !expected.matches(&actual) {
                    return FacetOutcome::fail(format!(
                        "the property {} in {} has the value {}, which is not {}",
                        property.name,
                        set_name,
                        actual,
                        expected.describe()
                    ));
                }
            }
        }
        FacetOutcome::pass()
    }

    fn describe(&self) -> String {
        match &self.value {
            Some(value) => format!(
                "a property {} in the set {} with value {}",
                self.name.describe(),
                self.property_set.describe(),
                value.describe()
            ),
            None => format!(
                "a property {} in the set {}",
                self.name.describe(),
                self.property_set.describe()
            ),
        }
    }

    fn parse(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            property_set: Parameter::parse(require_child(element, "propertySet")?)?,
            name: Parameter::parse(require_child(element, "name")?)?,
            value: element.child("value").map(Parameter::parse).transpose()?,
            instructions: instructions_of(element),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("property")
            .with_child(self.property_set.to_xml("propertySet"))
            .with_child(self.name.to_xml("name"));
        if let Some(value) = &self.value {
            element.children.push(value.to_xml("value"));
        }
        push_instructions(&mut element, &self.instructions);
        element
    }
}

/// Part-of facet: some transitive container of the element must be of the
/// given class.
#[derive(Clone, Debug, PartialEq)]
pub struct PartOfFacet {
    /// IFC class name of the required whole
    pub entity: String,
    /// Free-text guidance carried through serialization
    pub instructions: Option<String>,
}

impl PartOfFacet {
    /// Create a part-of facet
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            instructions: None,
        }
    }

    fn evaluate(&self, model: &dyn AuditModel, element: &ModelElement) -> FacetOutcome {
        let containers = model.associations().containers(element.id);
        if containers.iter().any(|c| c.class.matches(&self.entity)) {
            FacetOutcome::pass()
        } else {
            FacetOutcome::fail(format!("is not part of an {}", self.entity))
        }
    }

    fn describe(&self) -> String {
        format!("part of an {}", self.entity)
    }

    fn parse(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            entity: element
                .attr("entity")
                .ok_or_else(|| IdsError::malformed("partOf facet without an entity"))?
                .to_string(),
            instructions: instructions_of(element),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("partOf").with_attr("entity", &self.entity);
        push_instructions(&mut element, &self.instructions);
        element
    }
}

/// Material facet: the element must have an associated material, whose
/// name satisfies the value parameter if one is given.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MaterialFacet {
    /// Optional constraint on the material name
    pub value: Option<Parameter>,
    /// Free-text guidance carried through serialization
    pub instructions: Option<String>,
}

impl MaterialFacet {
    /// Create a material facet
    pub fn new(value: Option<Parameter>) -> Self {
        Self {
            value,
            instructions: None,
        }
    }

    fn evaluate(&self, model: &dyn AuditModel, element: &ModelElement) -> FacetOutcome {
        let materials = model.associations().materials(element.id);
        if materials.is_empty() {
            return FacetOutcome::fail("has no associated material");
        }
        match &self.value {
            None => FacetOutcome::pass(),
            Some(expected) => {
                if materials.iter().any(|m| expected.matches(m)) {
                    FacetOutcome::pass()
                } else {
                    FacetOutcome::fail(format!(
                        "has the material(s) [{}], none of which is {}",
                        materials.join(", "),
                        expected.describe()
                    ))
                }
            }
        }
    }

    fn describe(&self) -> String {
        match &self.value {
            Some(value) => format!("a material {}", value.describe()),
            None => "any material".to_string(),
        }
    }

    fn parse(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            value: element.child("value").map(Parameter::parse).transpose()?,
            instructions: instructions_of(element),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("material");
        if let Some(value) = &self.value {
            element.children.push(value.to_xml("value"));
        }
        push_instructions(&mut element, &self.instructions);
        element
    }
}

/// One typed rule usable in an applicability or requirements clause
#[derive(Clone, Debug, PartialEq)]
pub enum Facet {
    Entity(EntityFacet),
    Attribute(AttributeFacet),
    Classification(ClassificationFacet),
    Property(PropertyFacet),
    PartOf(PartOfFacet),
    Material(MaterialFacet),
}

impl Facet {
    /// The facet's element name in documents
    pub fn kind(&self) -> &'static str {
        match self {
            Facet::Entity(_) => "entity",
            Facet::Attribute(_) => "attribute",
            Facet::Classification(_) => "classification",
            Facet::Property(_) => "property",
            Facet::PartOf(_) => "partOf",
            Facet::Material(_) => "material",
        }
    }

    /// Whether this is an entity facet (consumed during filtering, skipped
    /// in per-element applicability tests)
    pub fn is_entity(&self) -> bool {
        matches!(self, Facet::Entity(_))
    }

    /// Evaluate the facet against one element
    pub fn evaluate(&self, model: &dyn AuditModel, element: &ModelElement) -> FacetOutcome {
        match self {
            Facet::Entity(facet) => facet.evaluate(element),
            Facet::Attribute(facet) => facet.evaluate(element),
            Facet::Classification(facet) => facet.evaluate(model, element),
            Facet::Property(facet) => facet.evaluate(model, element),
            Facet::PartOf(facet) => facet.evaluate(model, element),
            Facet::Material(facet) => facet.evaluate(model, element),
        }
    }

    /// Narrow or pass through a candidate set
    ///
    /// Only entity facets narrow; every other kind returns the candidates
    /// unchanged and is applied per element later.
    pub fn filter(
        &self,
        model: &dyn AuditModel,
        candidates: Vec<Arc<ModelElement>>,
    ) -> Vec<Arc<ModelElement>> {
        match self {
            Facet::Entity(facet) => facet.filter(model, candidates),
            _ => candidates,
        }
    }

    /// One-line phrasing used by reports
    pub fn describe(&self) -> String {
        match self {
            Facet::Entity(facet) => facet.describe(),
            Facet::Attribute(facet) => facet.describe(),
            Facet::Classification(facet) => facet.describe(),
            Facet::Property(facet) => facet.describe(),
            Facet::PartOf(facet) => facet.describe(),
            Facet::Material(facet) => facet.describe(),
        }
    }

    /// Parse a facet element by name
    ///
    /// Returns `Ok(None)` for names outside the known set so that clause
    /// parsers can skip them (forward compatibility).
    pub fn parse(element: &XmlElement) -> Result<Option<Facet>> {
        let facet = match element.name.as_str() {
            "entity" => Facet::Entity(EntityFacet::parse(element)?),
            "attribute" => Facet::Attribute(AttributeFacet::parse(element)?),
            "classification" => Facet::Classification(ClassificationFacet::parse(element)?),
            "property" => Facet::Property(PropertyFacet::parse(element)?),
            "partOf" => Facet::PartOf(PartOfFacet::parse(element)?),
            "material" => Facet::Material(MaterialFacet::parse(element)?),
            _ => return Ok(None),
        };
        Ok(Some(facet))
    }

    /// Serialize to the facet's XML element
    pub fn to_xml(&self) -> XmlElement {
        match self {
            Facet::Entity(facet) => facet.to_xml(),
            Facet::Attribute(facet) => facet.to_xml(),
            Facet::Classification(facet) => facet.to_xml(),
            Facet::Property(facet) => facet.to_xml(),
            Facet::PartOf(facet) => facet.to_xml(),
            Facet::Material(facet) => facet.to_xml(),
        }
    }
}

fn require_child<'a>(element: &'a XmlElement, name: &str) -> Result<&'a XmlElement> {
    element.child(name).ok_or_else(|| {
        IdsError::malformed(format!("{} facet without a '{}'", element.name, name))
    })
}

fn instructions_of(element: &XmlElement) -> Option<String> {
    element
        .attr("instructions")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn push_instructions(element: &mut XmlElement, instructions: &Option<String>) {
    if let Some(instructions) = instructions {
        element
            .attributes
            .push(("instructions".to_string(), instructions.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_audit_model::{
        AttributeValue, ClassificationRef, MemoryModel, Property, PropertySet,
    };

    fn wall_model() -> (MemoryModel, Arc<ModelElement>) {
        let mut model = MemoryModel::new("IFC4");
        let id = model.add_element(
            "IfcWall",
            [
                ("Name", AttributeValue::String("W-01".into())),
                ("Type", AttributeValue::String("Internal".into())),
                ("PredefinedType", AttributeValue::Enum("SOLIDWALL".into())),
            ],
        );
        let element = model.elements().get(id).unwrap();
        (model, element)
    }

    #[test]
    fn entity_facet_filters_by_class_and_predefined_type() {
        let (mut model, _) = wall_model();
        model.add_element("IfcSlab", [("Name", AttributeValue::Null)]);
        model.add_element(
            "IfcWall",
            [("PredefinedType", AttributeValue::Enum("PARTITIONING".into()))],
        );

        let plain = EntityFacet::new(Parameter::value("IFCWALL"));
        assert_eq!(plain.filter(&model, Vec::new()).len(), 2);

        let mut typed = EntityFacet::new(Parameter::value("IFCWALL"));
        typed.predefined_type = Some(Parameter::value("SOLIDWALL"));
        let filtered = typed.filter(&model, Vec::new());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].predefined_type(), Some("SOLIDWALL"));
    }

    #[test]
    fn entity_facet_name_restriction_scans_all_classes() {
        let (mut model, _) = wall_model();
        model.add_element("IfcWallStandardCase", [] as [(&str, AttributeValue); 0]);
        model.add_element("IfcSlab", [] as [(&str, AttributeValue); 0]);

        let facet = EntityFacet::new(Parameter::Restriction(
            crate::Restriction::new(vec![crate::Constraint::Pattern(
                crate::restriction::PatternConstraint::new("IFCWALL.*").unwrap(),
            )]),
        ));
        assert_eq!(facet.filter(&model, Vec::new()).len(), 2);
    }

    #[test]
    fn attribute_facet_reports_offending_value() {
        let (model, element) = wall_model();
        let facet = AttributeFacet::new(
            Parameter::value("Type"),
            Some(Parameter::enumeration(["External"])),
        );

        let outcome = Facet::Attribute(facet).evaluate(&model, &element);
        assert!(!outcome.passed());
        let reason = outcome.into_reason();
        assert!(reason.contains("Internal"), "reason was: {reason}");
        assert!(reason.contains("External"), "reason was: {reason}");
    }

    #[test]
    fn attribute_facet_missing_and_empty() {
        let (model, element) = wall_model();

        let missing = AttributeFacet::new(Parameter::value("Description"), None);
        assert!(!Facet::Attribute(missing).evaluate(&model, &element).passed());

        let present = AttributeFacet::new(Parameter::value("Name"), None);
        assert!(Facet::Attribute(present).evaluate(&model, &element).passed());
    }

    #[test]
    fn classification_facet_matches_any_reference() {
        let (mut model, element) = wall_model();
        model
            .add_classification(element.id, ClassificationRef::new("Uniclass 2015", "EF_25_10"))
            .unwrap();

        let hit = ClassificationFacet::new(
            Some(Parameter::value("Uniclass 2015")),
            Some(Parameter::value("EF_25_10")),
        );
        assert!(Facet::Classification(hit).evaluate(&model, &element).passed());

        let miss = ClassificationFacet::new(None, Some(Parameter::value("EF_99")));
        let outcome = Facet::Classification(miss).evaluate(&model, &element);
        assert!(!outcome.passed());
        assert!(outcome.into_reason().contains("EF_25_10"));
    }

    #[test]
    fn property_facet_checks_set_then_name_then_value() {
        let (mut model, element) = wall_model();
        let mut pset = PropertySet::new("Pset_WallCommon");
        pset.add(Property::new("FireRating", AttributeValue::String("F60".into())));
        model.add_property_set(element.id, pset).unwrap();

        let wrong_set = PropertyFacet::new(
            Parameter::value("Pset_Other"),
            Parameter::value("FireRating"),
            None,
        );
        assert!(!Facet::Property(wrong_set).evaluate(&model, &element).passed());

        let wrong_value = PropertyFacet::new(
            Parameter::value("Pset_WallCommon"),
            Parameter::value("FireRating"),
            Some(Parameter::value("F90")),
        );
        let outcome = Facet::Property(wrong_value).evaluate(&model, &element);
        assert!(outcome.clone().into_reason().contains("F60"));

        let exact = PropertyFacet::new(
            Parameter::value("Pset_WallCommon"),
            Parameter::value("FireRating"),
            Some(Parameter::value("F60")),
        );
        assert!(Facet::Property(exact).evaluate(&model, &element).passed());
    }

    #[test]
    fn part_of_facet_walks_containers() {
        let (mut model, element) = wall_model();
        let storey = model.add_element("IfcBuildingStorey", [] as [(&str, AttributeValue); 0]);
        let building = model.add_element("IfcBuilding", [] as [(&str, AttributeValue); 0]);
        model.set_container(element.id, storey).unwrap();
        model.set_container(storey, building).unwrap();

        let direct = PartOfFacet::new("IfcBuildingStorey");
        assert!(Facet::PartOf(direct).evaluate(&model, &element).passed());
        let transitive = PartOfFacet::new("IFCBUILDING");
        assert!(Facet::PartOf(transitive).evaluate(&model, &element).passed());
        let absent = PartOfFacet::new("IfcSite");
        assert!(!Facet::PartOf(absent).evaluate(&model, &element).passed());
    }

    #[test]
    fn material_facet_with_and_without_value() {
        let (mut model, element) = wall_model();

        let any = MaterialFacet::new(None);
        assert!(!Facet::Material(any.clone()).evaluate(&model, &element).passed());

        model.add_material(element.id, "Concrete").unwrap();
        assert!(Facet::Material(any).evaluate(&model, &element).passed());

        let named = MaterialFacet::new(Some(Parameter::value("Steel")));
        let outcome = Facet::Material(named).evaluate(&model, &element);
        assert!(outcome.into_reason().contains("Concrete"));
    }

    #[test]
    fn unknown_facet_name_is_skipped() {
        let element = XmlElement::new("quantity");
        assert!(Facet::parse(&element).unwrap().is_none());
    }

    #[test]
    fn facet_xml_round_trip() {
        let facet = Facet::Attribute(AttributeFacet::new(
            Parameter::value("Type"),
            Some(Parameter::enumeration(["Internal", "External"])),
        ));
        let tree = facet.to_xml();
        assert_eq!(tree.name, "attribute");

        let reparsed = Facet::parse(&tree).unwrap().unwrap();
        assert_eq!(reparsed, facet);
    }
}
