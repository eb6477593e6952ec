pub mod config;
pub mod dates;
pub mod mapper;
pub mod models;
pub mod priority;
pub mod record;
pub mod store;

pub use mapper::{to_domain, to_domain_at, to_persisted};
pub use models::{Action, ActionType, Lead, LeadStatus, PipelineType, Tag};
pub use priority::{rank, score_and_sort, SortMode};
pub use record::LeadRecord;
