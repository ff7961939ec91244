// 🏠 Place Entities - Place, Amenity, Review
//
// Place is the only class with numeric and list attributes, so it is
// where update coercion actually changes the stored type.

use crate::attributes::AttributeDefinition;

pub const PLACE_SCHEMA: &[AttributeDefinition] = &[
    AttributeDefinition::string("city_id"),
    AttributeDefinition::string("user_id"),
    AttributeDefinition::string("name"),
    AttributeDefinition::string("description"),
    AttributeDefinition::integer("number_rooms"),
    AttributeDefinition::integer("number_bathrooms"),
    AttributeDefinition::integer("max_guest"),
    AttributeDefinition::integer("price_by_night"),
    AttributeDefinition::float("latitude"),
    AttributeDefinition::float("longitude"),
    AttributeDefinition::list("amenity_ids"),
];

pub const AMENITY_SCHEMA: &[AttributeDefinition] = &[AttributeDefinition::string("name")];

pub const REVIEW_SCHEMA: &[AttributeDefinition] = &[
    AttributeDefinition::string("place_id"),
    AttributeDefinition::string("user_id"),
    AttributeDefinition::string("text"),
];
