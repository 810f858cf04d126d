// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model access

use crate::EntityId;
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while building or querying a model
#[derive(Error, Debug)]
pub enum ModelError {
    /// Referenced element does not exist in the store
    #[error("Element {0} not found")]
    ElementNotFound(EntityId),

    /// A containment edge would make an element its own ancestor
    #[error("Containment cycle involving element {0}")]
    ContainmentCycle(EntityId),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl ModelError {
    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        ModelError::Other(msg.into())
    }
}
