//! Cross-entity reaction references.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference from a drug-reaction matrix row to a reaction event.
///
/// Persisted reactions are referenced by `id`, reactions created in the same
/// request (or during import) by their transient `uuid`. In JSON a reference is
/// either an integer or a UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReactionRef {
    Id(i64),
    Uuid(Uuid),
}

impl From<i64> for ReactionRef {
    fn from(id: i64) -> Self {
        ReactionRef::Id(id)
    }
}

impl From<Uuid> for ReactionRef {
    fn from(uuid: Uuid) -> Self {
        ReactionRef::Uuid(uuid)
    }
}

impl fmt::Display for ReactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionRef::Id(id) => write!(f, "{id}"),
            ReactionRef::Uuid(uuid) => write!(f, "{uuid}"),
        }
    }
}
