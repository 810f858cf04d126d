// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the IDS engine
//!
//! Requirement failures are never errors: they are recorded as audit state
//! on the owning specification. Errors here cover malformed documents,
//! schema violations and I/O.

use crate::schema::Violation;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, IdsError>;

/// Errors that can occur while loading, writing or validating documents
#[derive(Error, Debug)]
pub enum IdsError {
    /// Markup could not be read or written
    #[error("XML error: {0}")]
    Xml(String),

    /// Well-formed markup that the IDS format cannot hold
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The document does not conform to the IDS schema
    #[error("Schema validation failed with {} violation(s)", .0.len())]
    SchemaValidation(Vec<Violation>),

    /// A pattern restriction does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A restriction constraint value is unusable (e.g., non-numeric bound)
    #[error("Invalid restriction: {0}")]
    InvalidRestriction(String),

    /// Report serialization error
    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IdsError {
    /// Create a malformed-document error
    pub fn malformed(msg: impl Into<String>) -> Self {
        IdsError::Malformed(msg.into())
    }

    /// Create an XML error
    pub fn xml(msg: impl ToString) -> Self {
        IdsError::Xml(msg.to_string())
    }
}

impl From<quick_xml::Error> for IdsError {
    fn from(err: quick_xml::Error) -> Self {
        IdsError::Xml(err.to_string())
    }
}
