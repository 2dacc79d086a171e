use std::sync::Arc;

use serde::Serialize;

use crate::criteria::{filter_and_sort, parse_criteria, SearchCriteria};
use crate::extractor::{CriteriaExtractor, ExtractionError};
use crate::property::Property;
use crate::property_store::PropertyStore;

/// Everything the caller needs to render "interpreted as X, found N".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub criteria: SearchCriteria,
    pub properties: Vec<Property>,
    pub total_found: usize,
    pub search_query: String,
}

/// Ties the extraction capability to the property store: free text goes out
/// to the extractor, the reply is decoded fail-open, and the resulting
/// criteria filter a store snapshot.
pub struct SearchEngine {
    store: Arc<PropertyStore>,
    extractor: Arc<dyn CriteriaExtractor>,
}

impl SearchEngine {
    pub fn new(store: Arc<PropertyStore>, extractor: Arc<dyn CriteriaExtractor>) -> Self {
        Self { store, extractor }
    }

    /// Fails only when the extraction service itself is unreachable or
    /// erroring; a malformed-but-present reply degrades to unfiltered
    /// results inside `parse_criteria`.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, ExtractionError> {
        log::info!("Search query: '{}'", query);

        let raw = self.extractor.extract(query).await?;
        let criteria = parse_criteria(&raw);

        let snapshot = self.store.list().await;
        let properties = filter_and_sort(&criteria, &snapshot);
        let total_found = properties.len();

        log::info!(
            "Interpreted criteria {:?}, matched {} of {} properties",
            criteria,
            total_found,
            snapshot.len()
        );

        Ok(SearchOutcome {
            criteria,
            properties,
            total_found,
            search_query: query.to_string(),
        })
    }
}
