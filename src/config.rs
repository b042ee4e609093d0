//! Runtime configuration
//!
//! Compiled defaults, overridable by `PRICEWATCH_*` environment variables,
//! overridable again by CLI flags.

use std::path::PathBuf;

/// Fixed listing endpoint of the sandbox catalog site.
pub const DEFAULT_CATALOG_URL: &str =
    "https://books.toscrape.com/catalogue/category/books_1/index.html";

/// Default OpenAI-compatible generation endpoint (a local Ollama).
pub const DEFAULT_GENERATION_URL: &str = "http://localhost:11434/v1";

/// Default generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "llama3";

/// Configuration for the tracker.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory holding one ledger database per tracked item.
    pub data_dir: PathBuf,
    /// Catalog listing page the pipeline scrapes.
    pub catalog_url: String,
    /// Base URL of the text-generation API.
    pub generation_url: String,
    /// Model name passed to the generation API.
    pub generation_model: String,
    /// Optional bearer key for the generation API.
    pub api_key: Option<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl WatchConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("PRICEWATCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("PRICEWATCH_CATALOG_URL") {
            config.catalog_url = url;
        }
        if let Ok(url) = std::env::var("PRICEWATCH_GENERATION_URL") {
            config.generation_url = url;
        }
        if let Ok(model) = std::env::var("PRICEWATCH_GENERATION_MODEL") {
            config.generation_model = model;
        }
        if let Ok(key) = std::env::var("PRICEWATCH_API_KEY") {
            config.api_key = Some(key);
        }
        config
    }
}

/// Default ledger directory (~/.local/share/pricewatch on Linux).
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"))
        .join("pricewatch")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_sandbox_catalog() {
        let config = WatchConfig::default();
        assert!(config.catalog_url.contains("books.toscrape.com"));
        assert!(config.data_dir.ends_with("pricewatch"));
        assert!(config.api_key.is_none());
    }
}
