// 🧱 Base Entity - identity, timestamps, open attribute map
//
// "id is IDENTITY (never changes), attributes are VALUES (can change)"
//
// Every registrable class shares this one struct; the class is a tag
// (EntityKind) that selects the attribute schema.

use super::EntityKind;
use crate::error::{CommandError, EntityError};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// Field naming the concrete class in the persisted mapping
pub const CLASS_FIELD: &str = "__class__";

/// ISO-8601 with microseconds, the timestamp form used in `to_dict`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Fields owned by the entity itself; `update` may not touch them
pub const RESERVED_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", CLASS_FIELD];

// ============================================================================
// ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    // ========================================================================
    // IDENTITY (never changes)
    // ========================================================================
    kind: EntityKind,
    id: String,

    // ========================================================================
    // TIMESTAMPS
    // ========================================================================
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    // ========================================================================
    // VALUES (open-ended)
    // ========================================================================
    attributes: Map<String, Value>,
}

impl Entity {
    /// Fresh entity: new UUID, created_at == updated_at
    pub fn new(kind: EntityKind) -> Self {
        // Stored at microsecond precision so a save/reload round trip is exact
        let now = Utc::now().trunc_subsecs(6);

        Entity {
            kind,
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            attributes: Map::new(),
        }
    }

    /// Rebuild an entity from its persisted mapping.
    ///
    /// `id` and both timestamps are taken as given, never regenerated.
    /// Every other field (except the discriminator) is copied verbatim.
    pub fn from_dict(kind: EntityKind, dict: &Map<String, Value>) -> Result<Self, EntityError> {
        let id = match dict.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::String(_)) => return Err(EntityError::EmptyId),
            _ => return Err(EntityError::MissingField("id")),
        };
        let created_at = timestamp_field(dict, "created_at")?;
        let updated_at = timestamp_field(dict, "updated_at")?;

        let attributes = dict
            .iter()
            .filter(|(name, _)| !RESERVED_FIELDS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(Entity {
            kind,
            id,
            created_at,
            updated_at,
            attributes,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The discriminator
    pub fn class_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Store key: "<ClassName>.<id>"
    pub fn key(&self) -> String {
        format!("{}.{}", self.class_name(), self.id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Attribute value, falling back to the declared default for schema attributes
    pub fn get(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned().or_else(|| {
            self.kind
                .attribute(name)
                .map(|definition| definition.default_value())
        })
    }

    /// Set an attribute. Identity and timestamps are read-only.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), CommandError> {
        if RESERVED_FIELDS.contains(&name) {
            return Err(CommandError::ReadOnlyAttribute(name.to_string()));
        }
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// Advance updated_at to now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().trunc_subsecs(6);
    }

    /// Attribute mapping plus id, timestamps and the discriminator.
    /// Used both for persistence and for display.
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = self.fields();
        dict.insert(CLASS_FIELD.to_string(), Value::String(self.class_name().to_string()));
        dict
    }

    /// id, timestamps and attributes, without the discriminator
    fn fields(&self) -> Map<String, Value> {
        let mut dict = self.attributes.clone();
        dict.insert("id".to_string(), Value::String(self.id.clone()));
        dict.insert(
            "created_at".to_string(),
            Value::String(self.created_at.format(TIMESTAMP_FORMAT).to_string()),
        );
        dict.insert(
            "updated_at".to_string(),
            Value::String(self.updated_at.format(TIMESTAMP_FORMAT).to_string()),
        );
        dict
    }
}

/// `[User] (<id>) {"created_at": ..., "id": ..., ...}`
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = Value::Object(self.fields());
        write!(f, "[{}] ({}) {}", self.class_name(), self.id, body)
    }
}

fn timestamp_field(
    dict: &Map<String, Value>,
    field: &'static str,
) -> Result<DateTime<Utc>, EntityError> {
    let raw = dict
        .get(field)
        .and_then(Value::as_str)
        .ok_or(EntityError::MissingField(field))?;
    parse_timestamp(raw).ok_or_else(|| EntityError::BadTimestamp {
        field,
        value: raw.to_string(),
    })
}

/// Accepts the `to_dict` form (naive ISO-8601, optional fraction) or RFC 3339
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)))
        .ok()
}

// ============================================================================
// TESTS
// ============================================================================
