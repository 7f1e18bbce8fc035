// Library root for the lead-share API

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod handlers;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::ApiError;
pub use models::{PrepStatus, ResetLeadPrepRequest, SharedProposal, VerifyPasswordRequest};
