// 🗺️ Location Entities - State and City
//
// A City points at its State through state_id.

use crate::attributes::AttributeDefinition;

pub const STATE_SCHEMA: &[AttributeDefinition] = &[AttributeDefinition::string("name")];

pub const CITY_SCHEMA: &[AttributeDefinition] = &[
    AttributeDefinition::string("state_id"),
    AttributeDefinition::string("name"),
];
