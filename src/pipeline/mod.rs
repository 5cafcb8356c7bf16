//! Pipeline module - load, classify, filter, derive, summarise

pub mod config;
pub mod correlation;
pub mod describe;
pub mod error;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod metrics;
pub mod missing;
pub mod performance;
pub mod schema;
pub mod session;
pub mod source;

pub use config::*;
pub use correlation::*;
pub use describe::*;
pub use error::*;
pub use filter::*;
pub use insights::*;
pub use loader::*;
pub use metrics::*;
pub use missing::*;
pub use performance::*;
pub use schema::*;
pub use session::*;
pub use source::*;
