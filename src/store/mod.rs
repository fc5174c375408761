//! Meterdeck record store
//!
//! This module provides the durable consumption event collection:
//!
//! - **types**: Core data structures (ConsumptionRecord, Property, DateSpan)
//! - **log**: Append-only durability log with CRC-checked entries
//! - **records**: The RecordStore itself (append + range scan)
//! - **properties**: Property -> owner lookup directory
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   RecordDraft → validate → RecordLog (fsync) → in-memory set
//!
//! Read Path:
//!   scan(property, span, type) → filter in memory → raw records
//! ```

pub mod error;
pub mod log;
pub mod properties;
pub mod records;
pub mod types;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use log::RecordLog;
pub use properties::PropertyDirectory;
pub use records::{RecordStore, StoreConfig};
pub use types::{
    is_aggregate_keyword, ConsumptionRecord, DateSpan, Property, RecordDraft, BOTH_KIND,
    COMBINED_KIND,
};
