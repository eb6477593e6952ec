pub mod file;
pub mod rest;
pub mod traits;
pub mod types;

pub use file::JsonFileStore;
pub use rest::RestLeadStore;
pub use traits::LeadStore;
pub use types::BackendParams;
