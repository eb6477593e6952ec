use serde::{Deserialize, Serialize};

/// Connection parameters for the hosted backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendParams {
    /// Project URL, tables live under `/rest/v1/`
    pub base_url: String,
    /// Key sent both as `apikey` and as bearer token
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Table holding the leads
    pub table: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Rows requested per page when fetching
    pub page_size: usize,
}

impl BackendParams {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// REST endpoint of the leads table
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }
}

impl Default for BackendParams {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            table: "leads".to_string(),
            timeout_secs: 30,
            page_size: 1000,
        }
    }
}
