// Entity Models
//
// Each entity has:
// - Stable identity (UUID) that NEVER changes
// - created_at / updated_at timestamps
// - A class tag (EntityKind) selecting its typed attribute schema
//
// Registration by name happens in crate::registry.

pub mod base;
pub mod user;
pub mod place;
pub mod location;

pub use base::{Entity, CLASS_FIELD, RESERVED_FIELDS, TIMESTAMP_FORMAT};

use crate::attributes::{self, AttributeDefinition};

// ============================================================================
// ENTITY KIND
// ============================================================================

/// One variant per registrable class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::BaseModel,
        EntityKind::User,
        EntityKind::State,
        EntityKind::City,
        EntityKind::Amenity,
        EntityKind::Place,
        EntityKind::Review,
    ];

    /// Class name used as discriminator and key prefix
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::BaseModel => "BaseModel",
            EntityKind::User => "User",
            EntityKind::State => "State",
            EntityKind::City => "City",
            EntityKind::Amenity => "Amenity",
            EntityKind::Place => "Place",
            EntityKind::Review => "Review",
        }
    }

    /// Declared attributes, consulted when `update` coerces a value
    pub fn schema(&self) -> &'static [AttributeDefinition] {
        match self {
            EntityKind::BaseModel => &[],
            EntityKind::User => user::USER_SCHEMA,
            EntityKind::State => location::STATE_SCHEMA,
            EntityKind::City => location::CITY_SCHEMA,
            EntityKind::Amenity => place::AMENITY_SCHEMA,
            EntityKind::Place => place::PLACE_SCHEMA,
            EntityKind::Review => place::REVIEW_SCHEMA,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&'static AttributeDefinition> {
        attributes::find(self.schema(), name)
    }
}
