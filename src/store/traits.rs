use crate::models::Action;
use crate::record::LeadRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that holds lead rows
/// (hosted backend table, local JSON export)
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Fetch every stored row
    async fn fetch_records(&self) -> Result<Vec<LeadRecord>>;

    /// Insert or update one row, matched on `id`
    async fn save_record(&self, record: &LeadRecord) -> Result<()>;

    /// Replace the `action_history` column of one lead.
    /// The primary row write never touches this column.
    async fn save_action_history(&self, lead_id: &str, actions: &[Action]) -> Result<()>;

    /// Get the name of the store
    fn source_name(&self) -> &'static str;
}
