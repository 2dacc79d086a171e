use std::sync::Arc;

use serde::Deserialize;
use warp::{reject, Rejection, Reply};

use crate::search::SearchEngine;
use crate::warp_helpers::ExtractionRejection;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub user_prompt: String,
}

pub async fn search_properties(
    request: SearchRequest,
    engine: Arc<SearchEngine>,
) -> Result<impl Reply, Rejection> {
    match engine.search(&request.user_prompt).await {
        Ok(outcome) => Ok(warp::reply::json(&outcome)),
        Err(e) => {
            log::error!("Criteria extraction failed: {}", e);
            Err(reject::custom(ExtractionRejection {
                message: e.to_string(),
            }))
        }
    }
}
