use serde::{Deserialize, Serialize};
use std::fmt;

/// A polymorphic reference to an entity of any host type.
///
/// Voters and voteables are both identified this way: a type name plus the
/// identifier of a row of that type. The reference is weak; nothing here
/// guarantees the referenced row still exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: i64,
}

impl EntityRef {
    /// Creates a reference to the entity of `entity_type` with the given id.
    pub fn new(entity_type: impl Into<String>, entity_id: i64) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.entity_id)
    }
}

/// Identity capability for host entity types.
///
/// Any type that can name itself and its row id can act as a voter or a
/// voteable. Implementors get `entity_ref` for free and pass the result to
/// the ledger and query APIs.
pub trait Entity {
    /// The entity type name, matching the name used at registration time.
    fn entity_type(&self) -> &str;

    /// The storage identifier of this entity's row.
    fn entity_id(&self) -> i64;

    /// The polymorphic reference for this entity.
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.entity_type(), self.entity_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post {
        id: i64,
    }

    impl Entity for Post {
        fn entity_type(&self) -> &str {
            "Post"
        }

        fn entity_id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_entity_ref_from_entity() {
        let post = Post { id: 42 };
        let entity_ref = post.entity_ref();
        assert_eq!(entity_ref, EntityRef::new("Post", 42));
    }

    #[test]
    fn test_entity_ref_display() {
        assert_eq!(EntityRef::new("Post", 7).to_string(), "Post/7");
    }
}
