use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Fixed instruction given to the extraction model: a single JSON object in
/// the criteria shape, null for anything the user did not constrain, no prose.
const EXTRACTION_INSTRUCTION: &str = "\
You are a real estate search assistant. Extract structured search criteria \
from the user's message. Respond with a single JSON object and nothing else, \
using exactly these keys: minPrice, maxPrice, minBedrooms, maxBedrooms, \
minBathrooms, maxBathrooms, minSqft, maxSqft, propertyTypes, \
requiredAmenities. Use null for any constraint the user did not mention. \
propertyTypes is an array of strings drawn from \"Single Family\", \"Condo\", \
\"Townhouse\", and \"Apartment\". requiredAmenities is an array of lowercase \
amenity strings. Do not wrap the JSON in markdown fences or add commentary.";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("extraction service returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("extraction service response contained no text content")]
    MalformedResponse,
    #[error("no extraction API key configured")]
    MissingApiKey,
}

/// Natural-language-to-criteria capability. Implementations return the raw
/// model text; decoding it into criteria is the search pipeline's job, so a
/// deterministic stub can exercise the tolerant-parse path in tests.
#[async_trait]
pub trait CriteriaExtractor: Send + Sync {
    async fn extract(&self, query: &str) -> Result<String, ExtractionError>;
}

/// Extractor backed by the Anthropic Messages API.
pub struct AnthropicExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicExtractor {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl CriteriaExtractor for AnthropicExtractor {
    async fn extract(&self, query: &str) -> Result<String, ExtractionError> {
        if self.api_key.is_empty() {
            return Err(ExtractionError::MissingApiKey);
        }

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: EXTRACTION_INSTRUCTION,
            messages: vec![Message {
                role: "user",
                content: query,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .ok_or(ExtractionError::MalformedResponse)
    }
}
