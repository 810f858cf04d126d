// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema gateway
//!
//! The canonical IDS schema is embedded in the crate and compiled exactly
//! once per process into element declaration tables. Validation walks a
//! document tree against those tables and reports every violation with a
//! path-style location.
//!
//! A corrupt embedded schema is unrecoverable: without it the engine can
//! neither produce nor consume documents, so the lazy initializer panics.

use crate::error::{IdsError, Result};
use crate::xml::{read_document, XmlElement};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The embedded canonical schema resource
const IDS_XSD: &str = include_str!("../resources/ids.xsd");

static SCHEMA: Lazy<IdsSchema> =
    Lazy::new(|| IdsSchema::parse(IDS_XSD).expect("embedded IDS schema is invalid"));

/// Get the process-wide schema, loading it on first use
pub fn get_schema() -> &'static IdsSchema {
    &SCHEMA
}

/// One schema violation: where and what
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Violation {
    /// Path to the offending element, e.g.
    /// `/ids/specifications/specification[2]`
    pub location: String,
    /// Human-readable cause
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

#[derive(Clone, Debug)]
struct AttrDecl {
    name: String,
    required: bool,
}

#[derive(Clone, Debug)]
struct ChildDecl {
    name: String,
    min: u32,
    /// `None` means unbounded
    max: Option<u32>,
}

#[derive(Clone, Debug)]
enum Content {
    /// Simple-typed element: text only, no children
    Text,
    /// Attributes only
    Empty,
    /// An ordered sequence: per-child cardinalities apply
    Sequence(Vec<ChildDecl>),
    /// A repeatable choice: any listed child, bounded as a group
    Choice {
        items: Vec<ChildDecl>,
        min: u32,
        max: Option<u32>,
    },
}

#[derive(Clone, Debug)]
struct ElementDecl {
    attrs: Vec<AttrDecl>,
    content: Content,
}

/// Compiled schema: element declarations by local name
pub struct IdsSchema {
    elements: FxHashMap<String, ElementDecl>,
}

/// Attributes that carry document plumbing, not content
const IGNORED_ATTRIBUTES: &[&str] = &["schemaLocation"];

impl IdsSchema {
    /// Compile a schema from XSD source
    pub fn parse(source: &str) -> Result<Self> {
        let tree = read_document(source)?;
        if tree.name != "schema" {
            return Err(IdsError::malformed("schema root must be xs:schema"));
        }

        let mut elements = FxHashMap::default();
        for decl in tree.children_named("element") {
            let name = decl
                .attr("name")
                .ok_or_else(|| IdsError::malformed("schema element without a name"))?
                .to_string();
            elements.insert(name, parse_element_decl(decl)?);
        }
        Ok(Self { elements })
    }

    /// Validate a document tree, collecting every violation
    pub fn validate(&self, root: &XmlElement) -> Result<()> {
        let mut violations = Vec::new();
        if root.name != "ids" {
            violations.push(Violation {
                location: format!("/{}", root.name),
                message: "root element must be 'ids'".to_string(),
            });
        } else {
            self.check(root, "/ids", &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(IdsError::SchemaValidation(violations))
        }
    }

    /// Validate a file on disk
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let source = std::fs::read_to_string(path)?;
        self.validate(&read_document(&source)?)
    }

    fn check(&self, element: &XmlElement, location: &str, violations: &mut Vec<Violation>) {
        let Some(decl) = self.elements.get(&element.name) else {
            violations.push(Violation {
                location: location.to_string(),
                message: format!("unknown element '{}'", element.name),
            });
            return;
        };

        for attr in &decl.attrs {
            if attr.required && element.attr(&attr.name).is_none() {
                violations.push(Violation {
                    location: location.to_string(),
                    message: format!("missing required attribute '{}'", attr.name),
                });
            }
        }
        for (name, _) in &element.attributes {
            if IGNORED_ATTRIBUTES.contains(&name.as_str()) {
                continue;
            }
            if !decl.attrs.iter().any(|a| &a.name == name) {
                violations.push(Violation {
                    location: location.to_string(),
                    message: format!("unexpected attribute '{name}'"),
                });
            }
        }

        match &decl.content {
            Content::Text | Content::Empty => {
                if !element.children.is_empty() {
                    violations.push(Violation {
                        location: location.to_string(),
                        message: format!("'{}' must not have child elements", element.name),
                    });
                }
            }
            Content::Sequence(items) => {
                self.check_children(element, items, location, violations);
                for item in items {
                    let count = element.children_named(&item.name).count() as u32;
                    if count < item.min {
                        violations.push(Violation {
                            location: location.to_string(),
                            message: format!("missing required element '{}'", item.name),
                        });
                    }
                    if let Some(max) = item.max {
                        if count > max {
                            violations.push(Violation {
                                location: location.to_string(),
                                message: format!(
                                    "element '{}' appears {} times, at most {} allowed",
                                    item.name, count, max
                                ),
                            });
                        }
                    }
                }
            }
            Content::Choice { items, min, max } => {
                self.check_children(element, items, location, violations);
                let total = element
                    .children
                    .iter()
                    .filter(|c| items.iter().any(|i| i.name == c.name))
                    .count() as u32;
                if total < *min {
                    violations.push(Violation {
                        location: location.to_string(),
                        message: format!(
                            "'{}' requires at least {} child element(s)",
                            element.name, min
                        ),
                    });
                }
                if let Some(max) = max {
                    if total > *max {
                        violations.push(Violation {
                            location: location.to_string(),
                            message: format!(
                                "'{}' allows at most {} child element(s)",
                                element.name, max
                            ),
                        });
                    }
                }
            }
        }
    }

    /// Flag unexpected children and recurse into known ones
    fn check_children(
        &self,
        element: &XmlElement,
        items: &[ChildDecl],
        location: &str,
        violations: &mut Vec<Violation>,
    ) {
        for child in &element.children {
            let child_location = child_path(element, child, location);
            if items.iter().any(|i| i.name == child.name) {
                self.check(child, &child_location, violations);
            } else {
                violations.push(Violation {
                    location: child_location,
                    message: format!(
                        "element '{}' is not allowed inside '{}'",
                        child.name, element.name
                    ),
                });
            }
        }
    }
}

/// Path segment for a child, indexed when siblings share its name
fn child_path(parent: &XmlElement, child: &XmlElement, location: &str) -> String {
    let siblings: Vec<&XmlElement> = parent.children_named(&child.name).collect();
    if siblings.len() > 1 {
        let index = siblings
            .iter()
            .position(|c| std::ptr::eq(*c, child))
            .unwrap_or(0)
            + 1;
        format!("{location}/{}[{index}]", child.name)
    } else {
        format!("{location}/{}", child.name)
    }
}

fn parse_element_decl(decl: &XmlElement) -> Result<ElementDecl> {
    // Simple-typed declaration: <xs:element name="title" type="xs:string"/>
    if decl.attr("type").is_some() {
        return Ok(ElementDecl {
            attrs: Vec::new(),
            content: Content::Text,
        });
    }

    let Some(complex) = decl.child("complexType") else {
        return Ok(ElementDecl {
            attrs: Vec::new(),
            content: Content::Text,
        });
    };

    let attrs = complex
        .children_named("attribute")
        .map(|a| {
            Ok(AttrDecl {
                name: a
                    .attr("name")
                    .ok_or_else(|| IdsError::malformed("schema attribute without a name"))?
                    .to_string(),
                required: a.attr("use") == Some("required"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let content = if let Some(sequence) = complex.child("sequence") {
        Content::Sequence(parse_child_decls(sequence)?)
    } else if let Some(choice) = complex.child("choice") {
        Content::Choice {
            items: parse_child_decls(choice)?,
            min: parse_occurs(choice.attr("minOccurs"), 1)?,
            max: parse_max_occurs(choice.attr("maxOccurs"))?,
        }
    } else {
        Content::Empty
    };

    Ok(ElementDecl { attrs, content })
}

fn parse_child_decls(group: &XmlElement) -> Result<Vec<ChildDecl>> {
    group
        .children_named("element")
        .map(|child| {
            let reference = child
                .attr("ref")
                .or_else(|| child.attr("name"))
                .ok_or_else(|| IdsError::malformed("schema group member without ref or name"))?;
            let name = reference
                .rsplit(':')
                .next()
                .unwrap_or(reference)
                .to_string();
            Ok(ChildDecl {
                name,
                min: parse_occurs(child.attr("minOccurs"), 1)?,
                max: parse_max_occurs(child.attr("maxOccurs"))?,
            })
        })
        .collect()
}

fn parse_occurs(value: Option<&str>, default: u32) -> Result<u32> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| IdsError::malformed(format!("invalid occurs value '{raw}'"))),
    }
}

fn parse_max_occurs(value: Option<&str>) -> Result<Option<u32>> {
    match value {
        None => Ok(Some(1)),
        Some("unbounded") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| IdsError::malformed(format!("invalid occurs value '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_doc() -> XmlElement {
        XmlElement::new("ids")
            .with_child(
                XmlElement::new("info")
                    .with_child(XmlElement::new("title").with_text("Audit")),
            )
            .with_child(
                XmlElement::new("specifications").with_child(
                    XmlElement::new("specification")
                        .with_attr("name", "S1")
                        .with_attr("ifcVersion", "IFC4")
                        .with_child(XmlElement::new("applicability"))
                        .with_child(XmlElement::new("requirements")),
                ),
            )
    }

    #[test]
    fn schema_is_cached_per_process() {
        let first = get_schema() as *const IdsSchema;
        let second = get_schema() as *const IdsSchema;
        assert_eq!(first, second);
    }

    #[test]
    fn minimal_document_validates() {
        get_schema().validate(&minimal_doc()).unwrap();
    }

    #[test]
    fn missing_required_attribute_is_located() {
        let mut doc = minimal_doc();
        doc.children[1].children[0].attributes.clear();

        let err = get_schema().validate(&doc).unwrap_err();
        let IdsError::SchemaValidation(violations) = err else {
            panic!("expected schema violations");
        };
        assert!(violations.iter().any(|v| {
            v.location == "/ids/specifications/specification"
                && v.message.contains("ifcVersion")
        }));
    }

    #[test]
    fn misplaced_element_is_flagged() {
        let mut doc = minimal_doc();
        // A specification directly under the root is out of place
        doc.children
            .push(XmlElement::new("specification").with_attr("name", "X"));

        let err = get_schema().validate(&doc).unwrap_err();
        let IdsError::SchemaValidation(violations) = err else {
            panic!("expected schema violations");
        };
        assert!(violations
            .iter()
            .any(|v| v.message.contains("not allowed inside")));
    }

    #[test]
    fn missing_title_is_flagged() {
        let mut doc = minimal_doc();
        doc.children[0].children.clear();

        let err = get_schema().validate(&doc).unwrap_err();
        let IdsError::SchemaValidation(violations) = err else {
            panic!("expected schema violations");
        };
        assert!(violations
            .iter()
            .any(|v| v.location == "/ids/info" && v.message.contains("title")));
    }
}
