// 👤 User Entity - account holder of places and reviews

use crate::attributes::AttributeDefinition;

pub const USER_SCHEMA: &[AttributeDefinition] = &[
    AttributeDefinition::string("email"),
    AttributeDefinition::string("password"),
    AttributeDefinition::string("first_name"),
    AttributeDefinition::string("last_name"),
];

#[cfg(test)]
mod tests {
    use crate::attributes::AttributeType;
    use crate::entities::{Entity, EntityKind};
    use serde_json::json;

    #[test]
    fn test_user_attributes_are_strings() {
        for name in ["email", "password", "first_name", "last_name"] {
            let def = EntityKind::User.attribute(name).unwrap();
            assert_eq!(def.type_, AttributeType::String);
        }
    }

    #[test]
    fn test_new_user_has_empty_defaults() {
        let user = Entity::new(EntityKind::User);

        assert!(user.attributes().is_empty());
        assert_eq!(user.get("first_name"), Some(json!("")));
    }

    #[test]
    fn test_numeric_looking_name_stays_text() {
        let def = EntityKind::User.attribute("first_name").unwrap();
        assert_eq!(def.type_.coerce("first_name", "89").unwrap(), json!("89"));
    }
}
