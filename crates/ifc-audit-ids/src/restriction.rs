// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value restrictions
//!
//! A restriction is the value-matching sub-language used inside facets:
//! enumerations, patterns, numeric bounds and length bounds over a simple
//! value. Facet parameter positions accept either a literal value or a
//! restriction; [`Parameter`] models that choice.

use crate::error::{IdsError, Result};
use crate::xml::XmlElement;
use regex::Regex;

/// A compiled pattern constraint
///
/// Patterns match the whole candidate string, as XSD patterns do.
#[derive(Clone, Debug)]
pub struct PatternConstraint {
    /// Pattern as written in the document
    pub source: String,
    regex: Regex,
}

impl PatternConstraint {
    /// Compile a pattern, anchoring it to the full string
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            IdsError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            }
        })?;
        Ok(Self { source, regex })
    }

    /// Test a candidate against the pattern
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

impl PartialEq for PatternConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A single restriction constraint
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Candidate must equal one of the listed values
    Enumeration(Vec<String>),
    /// Candidate must match the pattern in full
    Pattern(PatternConstraint),
    /// Numeric lower bound, inclusive
    MinInclusive(f64),
    /// Numeric upper bound, inclusive
    MaxInclusive(f64),
    /// Numeric lower bound, exclusive
    MinExclusive(f64),
    /// Numeric upper bound, exclusive
    MaxExclusive(f64),
    /// Exact character length
    Length(usize),
    /// Minimum character length
    MinLength(usize),
    /// Maximum character length
    MaxLength(usize),
}

impl Constraint {
    /// Test a candidate value against this constraint
    ///
    /// Numeric bounds never hold for a non-numeric candidate.
    pub fn holds(&self, candidate: &str) -> bool {
        match self {
            Constraint::Enumeration(values) => {
                values.iter().any(|v| values_equal(v, candidate))
            }
            Constraint::Pattern(pattern) => pattern.is_match(candidate),
            Constraint::MinInclusive(bound) => as_number(candidate).is_some_and(|n| n >= *bound),
            Constraint::MaxInclusive(bound) => as_number(candidate).is_some_and(|n| n <= *bound),
            Constraint::MinExclusive(bound) => as_number(candidate).is_some_and(|n| n > *bound),
            Constraint::MaxExclusive(bound) => as_number(candidate).is_some_and(|n| n < *bound),
            Constraint::Length(len) => candidate.chars().count() == *len,
            Constraint::MinLength(len) => candidate.chars().count() >= *len,
            Constraint::MaxLength(len) => candidate.chars().count() <= *len,
        }
    }

    fn describe(&self) -> String {
        match self {
            Constraint::Enumeration(values) => format!("one of [{}]", values.join(", ")),
            Constraint::Pattern(pattern) => format!("matching the pattern '{}'", pattern.source),
            Constraint::MinInclusive(b) => format!("at least {b}"),
            Constraint::MaxInclusive(b) => format!("at most {b}"),
            Constraint::MinExclusive(b) => format!("more than {b}"),
            Constraint::MaxExclusive(b) => format!("less than {b}"),
            Constraint::Length(l) => format!("exactly {l} character(s) long"),
            Constraint::MinLength(l) => format!("at least {l} character(s) long"),
            Constraint::MaxLength(l) => format!("at most {l} character(s) long"),
        }
    }
}

/// A value restriction: a base type plus a conjunction of constraints
#[derive(Clone, Debug, PartialEq)]
pub struct Restriction {
    /// XSD base type local name (e.g., "string", "double")
    pub base: String,
    /// Constraints, all of which must hold
    pub constraints: Vec<Constraint>,
}

impl Restriction {
    /// Create a restriction over strings
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self {
            base: "string".to_string(),
            constraints,
        }
    }

    /// Shortcut for an enumeration restriction
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(vec![Constraint::Enumeration(
            values.into_iter().map(Into::into).collect(),
        )])
    }

    /// Test a candidate against every constraint
    pub fn matches(&self, candidate: &str) -> bool {
        self.constraints.iter().all(|c| c.holds(candidate))
    }

    /// Human-readable phrasing used in failure reasons
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self.constraints.iter().map(|c| c.describe()).collect();
        parts.join(" and ")
    }

    /// Parse a `restriction` element
    pub fn parse(element: &XmlElement) -> Result<Self> {
        let base = element
            .attr("base")
            .map(|b| b.rsplit(':').next().unwrap_or(b).to_string())
            .unwrap_or_else(|| "string".to_string());

        let mut enumeration: Vec<String> = Vec::new();
        let mut constraints = Vec::new();
        for child in &element.children {
            let value = || -> Result<&str> {
                child.attr("value").ok_or_else(|| {
                    IdsError::malformed(format!("restriction {} without a value", child.name))
                })
            };
            match child.name.as_str() {
                "enumeration" => enumeration.push(value()?.to_string()),
                "pattern" => {
                    constraints.push(Constraint::Pattern(PatternConstraint::new(value()?)?))
                }
                "minInclusive" => constraints.push(Constraint::MinInclusive(numeric(value()?)?)),
                "maxInclusive" => constraints.push(Constraint::MaxInclusive(numeric(value()?)?)),
                "minExclusive" => constraints.push(Constraint::MinExclusive(numeric(value()?)?)),
                "maxExclusive" => constraints.push(Constraint::MaxExclusive(numeric(value()?)?)),
                "length" => constraints.push(Constraint::Length(integer(value()?)?)),
                "minLength" => constraints.push(Constraint::MinLength(integer(value()?)?)),
                "maxLength" => constraints.push(Constraint::MaxLength(integer(value()?)?)),
                // Unknown constraint kinds are skipped for forward
                // compatibility, same as unknown facets
                _ => {}
            }
        }
        if !enumeration.is_empty() {
            constraints.insert(0, Constraint::Enumeration(enumeration));
        }

        Ok(Self { base, constraints })
    }

    /// Serialize back to a `restriction` element
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("restriction").with_attr("base", format!("xs:{}", self.base));
        for constraint in &self.constraints {
            match constraint {
                Constraint::Enumeration(values) => {
                    for value in values {
                        element
                            .children
                            .push(XmlElement::new("enumeration").with_attr("value", value));
                    }
                }
                Constraint::Pattern(pattern) => element
                    .children
                    .push(XmlElement::new("pattern").with_attr("value", &pattern.source)),
                Constraint::MinInclusive(b) => push_bound(&mut element, "minInclusive", *b),
                Constraint::MaxInclusive(b) => push_bound(&mut element, "maxInclusive", *b),
                Constraint::MinExclusive(b) => push_bound(&mut element, "minExclusive", *b),
                Constraint::MaxExclusive(b) => push_bound(&mut element, "maxExclusive", *b),
                Constraint::Length(l) => push_length(&mut element, "length", *l),
                Constraint::MinLength(l) => push_length(&mut element, "minLength", *l),
                Constraint::MaxLength(l) => push_length(&mut element, "maxLength", *l),
            }
        }
        element
    }
}

fn push_bound(element: &mut XmlElement, name: &str, bound: f64) {
    element
        .children
        .push(XmlElement::new(name).with_attr("value", format!("{bound}")));
}

fn push_length(element: &mut XmlElement, name: &str, length: usize) {
    element
        .children
        .push(XmlElement::new(name).with_attr("value", format!("{length}")));
}

fn numeric(raw: &str) -> Result<f64> {
    raw.parse()
        .map_err(|_| IdsError::InvalidRestriction(format!("'{raw}' is not a number")))
}

fn integer(raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| IdsError::InvalidRestriction(format!("'{raw}' is not a length")))
}

fn as_number(candidate: &str) -> Option<f64> {
    candidate.trim().parse().ok()
}

/// Compare two simple values: numerically when both parse as numbers,
/// otherwise as strings
pub(crate) fn values_equal(expected: &str, actual: &str) -> bool {
    match (as_number(expected), as_number(actual)) {
        (Some(a), Some(b)) => a == b,
        _ => expected == actual,
    }
}

/// A facet parameter: either a literal value or a restriction
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    /// Literal value, compared with [`values_equal`]
    Value(String),
    /// Restriction over the value
    Restriction(Restriction),
}

impl Parameter {
    /// Shortcut for a literal parameter
    pub fn value(value: impl Into<String>) -> Self {
        Parameter::Value(value.into())
    }

    /// Shortcut for an enumeration parameter
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Parameter::Restriction(Restriction::enumeration(values))
    }

    /// Test a candidate value
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Parameter::Value(expected) => values_equal(expected, candidate),
            Parameter::Restriction(restriction) => restriction.matches(candidate),
        }
    }

    /// Case-insensitive test, used for IFC class and enumeration names
    pub fn matches_ignore_case(&self, candidate: &str) -> bool {
        match self {
            Parameter::Value(expected) => expected.eq_ignore_ascii_case(candidate),
            Parameter::Restriction(restriction) => {
                restriction.matches(candidate) || restriction.matches(&candidate.to_uppercase())
            }
        }
    }

    /// Human-readable phrasing used in failure reasons
    pub fn describe(&self) -> String {
        match self {
            Parameter::Value(value) => format!("'{value}'"),
            Parameter::Restriction(restriction) => restriction.describe(),
        }
    }

    /// Parse a parameter wrapper element (`name`, `value`, `system`, ...):
    /// one `simpleValue` or one `restriction` child
    pub fn parse(wrapper: &XmlElement) -> Result<Self> {
        if let Some(simple) = wrapper.child("simpleValue") {
            return Ok(Parameter::Value(
                simple.text_content().unwrap_or_default().to_string(),
            ));
        }
        if let Some(restriction) = wrapper.child("restriction") {
            return Ok(Parameter::Restriction(Restriction::parse(restriction)?));
        }
        Err(IdsError::malformed(format!(
            "'{}' needs a simpleValue or a restriction",
            wrapper.name
        )))
    }

    /// Serialize under the given wrapper element name
    pub fn to_xml(&self, wrapper_name: &str) -> XmlElement {
        let inner = match self {
            Parameter::Value(value) => XmlElement::new("simpleValue").with_text(value),
            Parameter::Restriction(restriction) => restriction.to_xml(),
        };
        XmlElement::new(wrapper_name).with_child(inner)
    }
}
