pub mod action;
pub mod lead;

pub use action::{Action, ActionType};
pub use lead::{Lead, LeadStatus, PipelineType, Tag, BEDROOMS_OVERFLOW_EIGHT, BEDROOMS_OVERFLOW_TEN, DEFAULT_CURRENCY};
