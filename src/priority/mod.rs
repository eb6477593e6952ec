pub mod scoring;
pub mod sort;

pub use scoring::{stage_score, tag_score, urgency_score, LeadScore, Urgency};
pub use sort::{group_by_stage, rank, score_and_sort, RankedLead, SortMode, StageColumn};
