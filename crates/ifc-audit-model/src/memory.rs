// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory reference implementation of the audit read contract
//!
//! `MemoryModel` backs tests and small tools. Mutators exist only to build
//! the fixture; once handed to an audit the model is used strictly through
//! the read-only traits.

use crate::{
    AssociationReader, AttributeValue, AuditModel, ClassificationRef, ElementReader, EntityId,
    ModelElement, ModelError, PropertyReader, PropertySet, Result,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// In-memory model store
pub struct MemoryModel {
    schema_version: String,
    elements: FxHashMap<u32, Arc<ModelElement>>,
    /// Insertion order, drives `all()` and per-class ordering
    order: Vec<EntityId>,
    /// Canonical class name -> element IDs
    class_index: FxHashMap<String, Vec<EntityId>>,
    property_sets: FxHashMap<u32, Vec<PropertySet>>,
    classifications: FxHashMap<u32, Vec<ClassificationRef>>,
    materials: FxHashMap<u32, Vec<String>>,
    /// Part -> immediate whole
    parent: FxHashMap<u32, EntityId>,
    next_id: u32,
}

impl MemoryModel {
    /// Create an empty model declaring the given schema version
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
            elements: FxHashMap::default(),
            order: Vec::new(),
            class_index: FxHashMap::default(),
            property_sets: FxHashMap::default(),
            classifications: FxHashMap::default(),
            materials: FxHashMap::default(),
            parent: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Change the declared schema version
    pub fn set_schema_version(&mut self, version: impl Into<String>) {
        self.schema_version = version.into();
    }

    /// Add an element with named attributes, returning its ID
    pub fn add_element<S, I>(&mut self, class: &str, attributes: I) -> EntityId
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, AttributeValue)>,
    {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let attributes = attributes
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect::<Vec<_>>();
        let element = Arc::new(ModelElement::new(id, class, attributes));

        self.class_index
            .entry(element.class.as_str().to_string())
            .or_default()
            .push(id);
        self.elements.insert(id.0, element);
        self.order.push(id);
        id
    }

    /// Attach a property set to an element
    pub fn add_property_set(&mut self, id: EntityId, pset: PropertySet) -> Result<()> {
        self.check_exists(id)?;
        self.property_sets.entry(id.0).or_default().push(pset);
        Ok(())
    }

    /// Attach a classification reference to an element
    pub fn add_classification(&mut self, id: EntityId, class_ref: ClassificationRef) -> Result<()> {
        self.check_exists(id)?;
        self.classifications.entry(id.0).or_default().push(class_ref);
        Ok(())
    }

    /// Associate a material name with an element
    pub fn add_material(&mut self, id: EntityId, material: impl Into<String>) -> Result<()> {
        self.check_exists(id)?;
        self.materials.entry(id.0).or_default().push(material.into());
        Ok(())
    }

    /// Declare that `part` is part of `whole`
    ///
    /// A part has at most one immediate whole; setting again replaces the
    /// edge. Edges that would close a cycle are rejected.
    pub fn set_container(&mut self, part: EntityId, whole: EntityId) -> Result<()> {
        self.check_exists(part)?;
        self.check_exists(whole)?;

        let mut cursor = Some(whole);
        while let Some(current) = cursor {
            if current == part {
                return Err(ModelError::ContainmentCycle(part));
            }
            cursor = self.parent.get(&current.0).copied();
        }

        self.parent.insert(part.0, whole);
        Ok(())
    }

    fn check_exists(&self, id: EntityId) -> Result<()> {
        if self.elements.contains_key(&id.0) {
            Ok(())
        } else {
            Err(ModelError::ElementNotFound(id))
        }
    }
}

impl AuditModel for MemoryModel {
    fn schema_version(&self) -> &str {
        &self.schema_version
    }

    fn elements(&self) -> &dyn ElementReader {
        self
    }

    fn properties(&self) -> &dyn PropertyReader {
        self
    }

    fn associations(&self) -> &dyn AssociationReader {
        self
    }
}

impl ElementReader for MemoryModel {
    fn get(&self, id: EntityId) -> Option<Arc<ModelElement>> {
        self.elements.get(&id.0).cloned()
    }

    fn by_class(&self, class_name: &str) -> Vec<Arc<ModelElement>> {
        let canonical = class_name.to_uppercase();
        self.class_index
            .get(&canonical)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    fn all(&self) -> Vec<Arc<ModelElement>> {
        self.order.iter().filter_map(|id| self.get(*id)).collect()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

impl PropertyReader for MemoryModel {
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet> {
        self.property_sets.get(&id.0).cloned().unwrap_or_default()
    }
}

impl AssociationReader for MemoryModel {
    fn classifications(&self, id: EntityId) -> Vec<ClassificationRef> {
        self.classifications.get(&id.0).cloned().unwrap_or_default()
    }

    fn materials(&self, id: EntityId) -> Vec<String> {
        self.materials.get(&id.0).cloned().unwrap_or_default()
    }

    fn containers(&self, id: EntityId) -> Vec<Arc<ModelElement>> {
        let mut chain = Vec::new();
        let mut seen = rustc_hash::FxHashSet::default();
        let mut cursor = self.parent.get(&id.0).copied();
        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            if let Some(element) = self.get(current) {
                chain.push(element);
            }
            cursor = self.parent.get(&current.0).copied();
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Property;

    fn sample() -> (MemoryModel, EntityId, EntityId) {
        let mut model = MemoryModel::new("IFC4");
        let storey = model.add_element(
            "IfcBuildingStorey",
            [("Name", AttributeValue::String("Ground Floor".into()))],
        );
        let wall = model.add_element(
            "IfcWall",
            [
                ("Name", AttributeValue::String("W-01".into())),
                ("PredefinedType", AttributeValue::Enum("SOLIDWALL".into())),
            ],
        );
        model.set_container(wall, storey).unwrap();
        (model, storey, wall)
    }

    #[test]
    fn by_class_is_case_insensitive() {
        let (model, _, wall) = sample();
        let walls = model.elements().by_class("ifcWALL");
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].id, wall);
        assert!(model.elements().by_class("IfcSlab").is_empty());
    }

    #[test]
    fn containers_walk_transitively_nearest_first() {
        let (mut model, storey, wall) = sample();
        let building = model.add_element("IfcBuilding", [("Name", AttributeValue::Null)]);
        model.set_container(storey, building).unwrap();

        let chain = model.associations().containers(wall);
        let classes: Vec<&str> = chain.iter().map(|e| e.class.as_str()).collect();
        assert_eq!(classes, vec!["IFCBUILDINGSTOREY", "IFCBUILDING"]);
    }

    #[test]
    fn container_cycles_are_rejected() {
        let (mut model, storey, wall) = sample();
        let err = model.set_container(storey, wall).unwrap_err();
        assert!(matches!(err, ModelError::ContainmentCycle(_)));
    }

    #[test]
    fn property_and_association_reads() {
        let (mut model, _, wall) = sample();
        let mut pset = PropertySet::new("Pset_WallCommon");
        pset.add(Property::new("IsExternal", AttributeValue::Bool(false)));
        model.add_property_set(wall, pset).unwrap();
        model
            .add_classification(wall, ClassificationRef::new("Uniclass 2015", "EF_25_10_25"))
            .unwrap();
        model.add_material(wall, "Concrete").unwrap();

        assert!(model.properties().property(wall, "Pset_WallCommon", "IsExternal").is_some());
        assert_eq!(model.associations().classifications(wall).len(), 1);
        assert_eq!(model.associations().materials(wall), vec!["Concrete"]);
    }

    #[test]
    fn unknown_element_errors_on_mutation() {
        let (mut model, _, _) = sample();
        let missing = EntityId(99);
        assert!(matches!(
            model.add_material(missing, "Steel"),
            Err(ModelError::ElementNotFound(_))
        ));
    }
}
