use log::{info, warn};
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::utils::mask_api_key;

pub const SEARCH_ENDPOINT: &str = "https://openapi.naver.com/v1/search/local.json";
pub const RECORD_FILE: &str = "records.json";
pub const BIND_ADDRESS: &str = "0.0.0.0:8501";

pub const CLIENT_ID_VAR: &str = "PLACE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "PLACE_CLIENT_SECRET";

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub search_endpoint: Url,
    pub record_file: PathBuf,
    pub bind_address: String,
}

impl Config {
    /// Reads the provider credentials from the environment. Missing values are
    /// left empty; the provider rejects them on the first search.
    pub fn from_env() -> Result<Self, url::ParseError> {
        Ok(Self {
            client_id: read_credential(CLIENT_ID_VAR),
            client_secret: read_credential(CLIENT_SECRET_VAR),
            search_endpoint: Url::parse(SEARCH_ENDPOINT)?,
            record_file: PathBuf::from(RECORD_FILE),
            bind_address: BIND_ADDRESS.to_string(),
        })
    }

    pub fn log_summary(&self) {
        info!("Search endpoint: {}", self.search_endpoint);
        info!("{}: {}", CLIENT_ID_VAR, mask_api_key(&self.client_id));
        info!("{}: {}", CLIENT_SECRET_VAR, "*".repeat(8));
        info!("Record file: {}", self.record_file.display());
    }

    #[cfg(test)]
    pub fn for_endpoint(endpoint: &str) -> Self {
        Self {
            client_id: "test-id".to_string(),
            client_secret: "test-secret".to_string(),
            search_endpoint: Url::parse(endpoint).expect("test endpoint is a valid URL"),
            record_file: PathBuf::from(RECORD_FILE),
            bind_address: "127.0.0.1:0".to_string(),
        }
    }
}

fn read_credential(name: &str) -> String {
    match env::var(name) {
        Ok(value) => value,
        Err(_) => {
            warn!("{} is not set; searches will be rejected by the provider", name);
            String::new()
        }
    }
}
