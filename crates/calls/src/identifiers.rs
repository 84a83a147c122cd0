//! Newtype identifiers.
//!
//! Calls are identified by a generated UUID so that tracing events emitted by a
//! decorator, its inner call and the transport can be correlated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a single call instance.
///
/// Generated fresh for every call, including clones: a clone is a new
/// exchange and must not share an identity with the call it was copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(Uuid);

impl CallId {
    /// Generates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(CallId::new(), CallId::new());
    }

    #[test]
    fn serializes_as_plain_uuid_string() {
        let uuid = Uuid::new_v4();
        let id = CallId::from_uuid(uuid);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
