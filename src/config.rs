use std::env;

#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub data_path: String,
    pub extraction: ExtractionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            port: env::var("HOME_FINDER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            host: env::var("HOME_FINDER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            data_path: env::var("HOME_FINDER_DATA_PATH")
                .unwrap_or_else(|_| "./data/properties.json".to_string()),
            extraction: ExtractionConfig {
                api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
                model: env::var("HOME_FINDER_MODEL")
                    .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".to_string()),
                timeout_secs: env::var("HOME_FINDER_EXTRACTION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            },
        })
    }
}
