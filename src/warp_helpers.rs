use std::convert::Infallible;
use std::sync::Arc;

use serde::Serialize;
use warp::{reject, Filter, Rejection, Reply};

use crate::property_store::PropertyStore;
use crate::search::SearchEngine;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationRejection {
    pub missing: Vec<String>,
}

impl reject::Reject for ValidationRejection {}

#[derive(Debug)]
pub struct PersistenceRejection {
    pub message: String,
}

impl reject::Reject for PersistenceRejection {}

#[derive(Debug)]
pub struct ExtractionRejection {
    pub message: String,
}

impl reject::Reject for ExtractionRejection {}

pub fn with_store(
    store: Arc<PropertyStore>,
) -> impl Filter<Extract = (Arc<PropertyStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

pub fn with_search_engine(
    engine: Arc<SearchEngine>,
) -> impl Filter<Extract = (Arc<SearchEngine>,), Error = Infallible> + Clone {
    warp::any().map(move || engine.clone())
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let error;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        error = "Not found";
        message = "The requested resource does not exist".to_string();
    } else if let Some(validation) = err.find::<ValidationRejection>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        error = "Missing required fields";
        message = format!(
            "The following fields are required: {}",
            validation.missing.join(", ")
        );
    } else if let Some(persistence) = err.find::<PersistenceRejection>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        error = "Failed to save property";
        message = persistence.message.clone();
    } else if let Some(extraction) = err.find::<ExtractionRejection>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        error = "Failed to process search request";
        message = extraction.message.clone();
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        code = warp::http::StatusCode::BAD_REQUEST;
        error = "Invalid request body";
        message = "Request body must be valid JSON".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        error = "Method not allowed";
        message = "The requested method is not allowed for this resource".to_string();
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        error = "Internal server error";
        message = "An unexpected error occurred".to_string();
    }

    let error_response = ErrorResponse {
        error: error.to_string(),
        message,
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&error_response),
        code,
    ))
}

pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
}
