use std::sync::Arc;

use serde::Serialize;
use warp::http::StatusCode;
use warp::{reject, Rejection, Reply};

use crate::property::{Property, PropertySubmission};
use crate::property_store::{PropertyStore, StoreError};
use crate::warp_helpers::{PersistenceRejection, ValidationRejection};

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
    pub property: Property,
}

pub async fn list_properties(store: Arc<PropertyStore>) -> Result<impl Reply, Rejection> {
    let properties = store.list().await;
    Ok(warp::reply::json(&properties))
}

pub async fn create_property(
    submission: PropertySubmission,
    store: Arc<PropertyStore>,
) -> Result<impl Reply, Rejection> {
    match store.append(submission).await {
        Ok(property) => Ok(warp::reply::with_status(
            warp::reply::json(&CreatedResponse {
                success: true,
                message: "Property listed successfully".to_string(),
                property,
            }),
            StatusCode::CREATED,
        )),
        Err(StoreError::Validation { missing }) => {
            Err(reject::custom(ValidationRejection { missing }))
        }
        Err(e @ StoreError::Persistence(_)) => {
            log::error!("Failed to persist property: {}", e);
            Err(reject::custom(PersistenceRejection {
                message: e.to_string(),
            }))
        }
    }
}
