//! Actor - the acting principal supplied by the identity provider

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// A participant as identified by the caller
///
/// The identity is trusted as given; credentials are verified upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
}

impl Actor {
    /// Create a new Actor
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
