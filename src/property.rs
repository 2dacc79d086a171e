use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=400";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub address: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft: u32,
    #[serde(rename = "type")]
    pub property_type: String,
    pub amenities: Vec<String>,
    pub lat: f64,
    pub lng: f64,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roommate: Option<RoommateInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoommateInfo {
    pub available: bool,
    pub count: u32,
    pub rent_per_person: f64,
    pub move_in_date: String,
    pub preferences: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Incoming listing submission. Every field is optional so validation can
/// report each missing field by name instead of failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySubmission {
    pub address: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub sqft: Option<u32>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image: Option<String>,
    pub roommate: Option<RoommateInfo>,
    pub contact: Option<ContactInfo>,
}

/// Built-in listings used when the backing file is missing or unreadable.
pub fn seed_properties() -> Vec<Property> {
    let raw = include_str!("seed_properties.json");
    serde_json::from_str(raw).expect("bundled seed data is valid JSON")
}
