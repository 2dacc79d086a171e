use std::path::PathBuf;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::property::{seed_properties, Property, PropertySubmission, PLACEHOLDER_IMAGE};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },
    #[error("failed to persist property list: {0}")]
    Persistence(#[from] std::io::Error),
}

/// File-backed listing store. All mutation goes through `append`, which holds
/// the write guard across both the id assignment and the file write so that
/// concurrent submissions cannot race on either.
pub struct PropertyStore {
    data_path: PathBuf,
    properties: Mutex<Vec<Property>>,
}

impl PropertyStore {
    /// Loads the property list from the backing file. A missing, unreadable,
    /// or malformed file falls back to the built-in seed listings; the caller
    /// never sees a load failure.
    pub fn load(data_path: impl Into<PathBuf>) -> Self {
        let data_path = data_path.into();
        let properties = match std::fs::read_to_string(&data_path) {
            Ok(raw) => match serde_json::from_str::<Vec<Property>>(&raw) {
                Ok(list) => {
                    info!(
                        "Loaded {} properties from {}",
                        list.len(),
                        data_path.display()
                    );
                    list
                }
                Err(e) => {
                    warn!(
                        "Property file {} is not valid JSON ({}), using seed data",
                        data_path.display(),
                        e
                    );
                    seed_properties()
                }
            },
            Err(e) => {
                warn!(
                    "Could not read property file {} ({}), using seed data",
                    data_path.display(),
                    e
                );
                seed_properties()
            }
        };

        Self {
            data_path,
            properties: Mutex::new(properties),
        }
    }

    /// Current snapshot of the listing set, in insertion order.
    pub async fn list(&self) -> Vec<Property> {
        self.properties.lock().await.clone()
    }

    /// Validates and appends a submission, assigning the next id and stamping
    /// the posting time. If the file write fails the in-memory append is
    /// rolled back, so memory and disk never disagree after a reported error.
    pub async fn append(&self, submission: PropertySubmission) -> Result<Property, StoreError> {
        let missing = missing_fields(&submission);
        if !missing.is_empty() {
            return Err(StoreError::Validation { missing });
        }

        let mut properties = self.properties.lock().await;
        let next_id = properties.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        let property = Property {
            id: next_id,
            address: submission.address.unwrap_or_default(),
            price: submission.price.unwrap_or_default(),
            bedrooms: submission.bedrooms.unwrap_or_default(),
            bathrooms: submission.bathrooms.unwrap_or_default(),
            sqft: submission.sqft.unwrap_or_default(),
            property_type: submission.property_type.unwrap_or_default(),
            amenities: submission.amenities.unwrap_or_default(),
            lat: submission.lat.unwrap_or_default(),
            lng: submission.lng.unwrap_or_default(),
            image: submission
                .image
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            roommate: submission.roommate,
            contact: submission.contact,
            date_posted: Some(chrono::Utc::now().to_rfc3339()),
        };

        properties.push(property.clone());
        if let Err(e) = self.persist(&properties) {
            properties.pop();
            return Err(e);
        }

        info!("Appended property {} at {}", property.id, property.address);
        Ok(property)
    }

    fn persist(&self, properties: &[Property]) -> Result<(), StoreError> {
        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(properties).map_err(std::io::Error::other)?;
        std::fs::write(&self.data_path, json)?;
        Ok(())
    }
}

/// Names every required field that is absent or empty. Strings must be
/// non-blank and price/sqft positive; zero bedrooms, bathrooms, or
/// coordinates are legitimate values and only absence is rejected.
fn missing_fields(submission: &PropertySubmission) -> Vec<String> {
    let mut missing = Vec::new();

    if submission
        .address
        .as_deref()
        .is_none_or(|a| a.trim().is_empty())
    {
        missing.push("address".to_string());
    }
    if submission.price.is_none_or(|p| p <= 0.0) {
        missing.push("price".to_string());
    }
    if submission.bedrooms.is_none() {
        missing.push("bedrooms".to_string());
    }
    if submission.bathrooms.is_none() {
        missing.push("bathrooms".to_string());
    }
    if submission.sqft.is_none_or(|s| s == 0) {
        missing.push("sqft".to_string());
    }
    if submission.lat.is_none() {
        missing.push("lat".to_string());
    }
    if submission.lng.is_none() {
        missing.push("lng".to_string());
    }
    if submission
        .property_type
        .as_deref()
        .is_none_or(|t| t.trim().is_empty())
    {
        missing.push("type".to_string());
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> PropertySubmission {
        PropertySubmission {
            address: Some("10 Test Way, San Francisco, CA".to_string()),
            price: Some(500_000.0),
            bedrooms: Some(2),
            bathrooms: Some(1.5),
            sqft: Some(900),
            property_type: Some("Condo".to_string()),
            amenities: None,
            lat: Some(37.7),
            lng: Some(-122.4),
            image: None,
            roommate: None,
            contact: None,
        }
    }

    #[test]
    fn missing_fields_reports_each_absent_field() {
        let missing = missing_fields(&PropertySubmission::default());
        assert_eq!(
            missing,
            vec!["address", "price", "bedrooms", "bathrooms", "sqft", "lat", "lng", "type"]
        );
    }

    #[test]
    fn missing_fields_accepts_zero_bedrooms() {
        let mut submission = valid_submission();
        submission.bedrooms = Some(0);
        assert!(missing_fields(&submission).is_empty());
    }

    #[test]
    fn missing_fields_rejects_blank_address_and_zero_price() {
        let mut submission = valid_submission();
        submission.address = Some("   ".to_string());
        submission.price = Some(0.0);
        assert_eq!(missing_fields(&submission), vec!["address", "price"]);
    }
}
