use crate::mapper;
use crate::models::Action;
use crate::record::LeadRecord;
use crate::store::traits::LeadStore;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Leads kept as a JSON array of rows on disk (a table export)
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw rows; a missing file is an empty table
    async fn read_rows(&self) -> Result<Vec<Value>> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?
        {
            Value::Array(rows) => Ok(rows),
            _ => bail!("{} does not hold a JSON array", self.path.display()),
        }
    }

    async fn write_rows(&self, rows: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(rows)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    fn find_row<'a>(rows: &'a mut [Value], id: &str) -> Option<&'a mut Map<String, Value>> {
        rows.iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
    }
}

#[async_trait]
impl LeadStore for JsonFileStore {
    async fn fetch_records(&self) -> Result<Vec<LeadRecord>> {
        let rows = self.read_rows().await?;
        let total = rows.len();

        let records: Vec<LeadRecord> = rows
            .into_iter()
            .filter(|row| row.is_object())
            .map(LeadRecord::from_value)
            .collect();

        if records.len() < total {
            warn!("Skipped {} rows that were not objects", total - records.len());
        }
        info!("Loaded {} leads from {}", records.len(), self.path.display());
        Ok(records)
    }

    async fn save_record(&self, record: &LeadRecord) -> Result<()> {
        let Some(id) = record.id.as_deref() else {
            bail!("Cannot save a lead without an id");
        };

        let Value::Object(fields) = serde_json::to_value(record)? else {
            bail!("Lead {} did not serialize to an object", id);
        };

        let mut rows = self.read_rows().await?;
        match Self::find_row(&mut rows, id) {
            // Columns missing from the record (action_history) are kept.
            Some(existing) => existing.extend(fields),
            None => rows.push(Value::Object(fields)),
        }
        self.write_rows(&rows).await?;

        debug!("Saved lead {} to {}", id, self.path.display());
        Ok(())
    }

    async fn save_action_history(&self, lead_id: &str, actions: &[Action]) -> Result<()> {
        let mut rows = self.read_rows().await?;
        let Some(row) = Self::find_row(&mut rows, lead_id) else {
            bail!("No lead {} in {}", lead_id, self.path.display());
        };
        row.insert(
            "action_history".to_string(),
            mapper::action_history_value(actions),
        );
        self.write_rows(&rows).await?;

        debug!("Saved {} actions for lead {}", actions.len(), lead_id);
        Ok(())
    }

    fn source_name(&self) -> &'static str {
        "JSON file"
    }
}
