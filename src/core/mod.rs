// Public modules
pub mod defaults;
pub mod error;
pub mod layout;
pub mod migrate;
pub mod rewrite;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use layout::{HeaderPolicy, Rules, Separator, SourceLayout};
pub use migrate::{FileOutcome, FileReport, MigrationSummary};
pub use rewrite::{Rewritten, StaleReference, Transform};
