use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{RatingsError, RatingsResult};

/// The kinds of content an entity reference can point at.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Wiki,
    Space,
    Document,
    Page,
    Attachment,
    PageAttachment,
    Block,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Wiki => "WIKI",
            EntityType::Space => "SPACE",
            EntityType::Document => "DOCUMENT",
            EntityType::Page => "PAGE",
            EntityType::Attachment => "ATTACHMENT",
            EntityType::PageAttachment => "PAGE_ATTACHMENT",
            EntityType::Block => "BLOCK",
        }
    }

    pub fn parse(value: &str) -> RatingsResult<Self> {
        match value {
            "WIKI" => Ok(EntityType::Wiki),
            "SPACE" => Ok(EntityType::Space),
            "DOCUMENT" => Ok(EntityType::Document),
            "PAGE" => Ok(EntityType::Page),
            "ATTACHMENT" => Ok(EntityType::Attachment),
            "PAGE_ATTACHMENT" => Ok(EntityType::PageAttachment),
            "BLOCK" => Ok(EntityType::Block),
            other => Err(RatingsError::decode(format!(
                "unknown entity type [{other}]"
            ))),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured reference to a rateable piece of content.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    pub entity_type: EntityType,
    pub reference: String,
}

impl EntityReference {
    pub fn new(entity_type: EntityType, reference: impl Into<String>) -> Self {
        Self {
            entity_type,
            reference: reference.into(),
        }
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.reference)
    }
}

/// A structured reference to the user who cast a vote.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UserReference(pub String);

impl UserReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps structured entity references to and from their opaque string form.
pub trait EntityReferenceResolver: Send + Sync {
    fn serialize(&self, reference: &EntityReference) -> String;
    fn resolve(&self, raw: &str, entity_type: EntityType) -> RatingsResult<EntityReference>;
}

/// Maps structured user references to and from their opaque string form.
pub trait UserReferenceResolver: Send + Sync {
    fn serialize(&self, user: &UserReference) -> String;
    fn resolve(&self, raw: &str) -> RatingsResult<UserReference>;
}

/// Resolver that treats the stored string itself as the canonical form.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpaqueEntityResolver;

impl EntityReferenceResolver for OpaqueEntityResolver {
    fn serialize(&self, reference: &EntityReference) -> String {
        reference.reference.clone()
    }

    fn resolve(&self, raw: &str, entity_type: EntityType) -> RatingsResult<EntityReference> {
        if raw.is_empty() {
            return Err(RatingsError::decode("empty entity reference"));
        }
        Ok(EntityReference::new(entity_type, raw))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OpaqueUserResolver;

impl UserReferenceResolver for OpaqueUserResolver {
    fn serialize(&self, user: &UserReference) -> String {
        user.0.clone()
    }

    fn resolve(&self, raw: &str) -> RatingsResult<UserReference> {
        if raw.is_empty() {
            return Err(RatingsError::decode("empty user reference"));
        }
        Ok(UserReference::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EntityReference, EntityReferenceResolver, EntityType, OpaqueEntityResolver,
        OpaqueUserResolver, UserReference, UserReferenceResolver,
    };

    #[test]
    fn entity_type_roundtrips_all_variants() {
        for entity_type in [
            EntityType::Wiki,
            EntityType::Space,
            EntityType::Document,
            EntityType::Page,
            EntityType::Attachment,
            EntityType::PageAttachment,
            EntityType::Block,
        ] {
            assert_eq!(EntityType::parse(entity_type.as_str()).unwrap(), entity_type);
        }
    }

    #[test]
    fn entity_type_rejects_unknown_names() {
        let err = EntityType::parse("GADGET").unwrap_err();
        assert!(err.to_string().contains("GADGET"));
    }

    #[test]
    fn opaque_resolvers_roundtrip() {
        let entities = OpaqueEntityResolver;
        let reference = EntityReference::new(EntityType::Block, "block:toto");
        let raw = entities.serialize(&reference);
        assert_eq!(raw, "block:toto");
        assert_eq!(entities.resolve(&raw, EntityType::Block).unwrap(), reference);

        let users = OpaqueUserResolver;
        let user = UserReference::new("user:Foobar");
        let raw = users.serialize(&user);
        assert_eq!(users.resolve(&raw).unwrap(), user);
    }

    #[test]
    fn opaque_resolvers_reject_empty_strings() {
        assert!(OpaqueEntityResolver
            .resolve("", EntityType::Page)
            .is_err());
        assert!(OpaqueUserResolver.resolve("").is_err());
    }
}
