use crate::models::PipelineType;
use crate::priority::SortMode;
use crate::store::BackendParams;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Where the leads come from
#[derive(Debug, Clone)]
pub enum LeadSource {
    Backend(BackendParams),
    File(PathBuf),
}

/// Runtime settings for the command-line tool
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: LeadSource,
    pub sort_mode: SortMode,
    pub pipeline: Option<PipelineType>,
    pub output: PathBuf,
}

impl AppConfig {
    /// Read settings from the process environment, after loading `.env`
    /// if one exists.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let source = match (get("LEADS_FILE"), get("LEADS_BACKEND_URL"), get("LEADS_API_KEY")) {
            (Some(path), _, _) => LeadSource::File(PathBuf::from(path)),
            (None, Some(url), Some(key)) => {
                let mut params = BackendParams::new(url, key);
                if let Some(table) = get("LEADS_TABLE") {
                    params.table = table;
                }
                LeadSource::Backend(params)
            }
            (None, Some(_), None) => bail!("LEADS_API_KEY must be set together with LEADS_BACKEND_URL"),
            (None, None, _) => bail!("Set LEADS_FILE, or LEADS_BACKEND_URL and LEADS_API_KEY"),
        };

        let sort_mode = match get("LEADS_SORT") {
            Some(raw) => raw.parse::<SortMode>().context("Invalid LEADS_SORT")?,
            None => SortMode::default(),
        };

        let pipeline = get("LEADS_PIPELINE")
            .map(|raw| raw.parse::<PipelineType>())
            .transpose()
            .context("Invalid LEADS_PIPELINE")?;

        let output = get("LEADS_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ranked_leads.json"));

        Ok(Self {
            source,
            sort_mode,
            pipeline,
            output,
        })
    }
}
