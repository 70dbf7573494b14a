//! Record decoding for forensic row recovery.
//!
//! Reconstructs the columns of a single leaf-cell record directly from raw
//! bytes, without page headers or B-tree metadata, and rejects byte runs that
//! only resemble a record.

pub mod backward;
pub mod column;
pub mod config;
pub mod constraint;
pub mod error;
pub mod record;
pub mod sweep;
pub mod value;
pub mod varint;

pub use config::ScanConfig;
pub use constraint::{parse_descriptor, DescriptorError, TypeConstraint, TypeSet};
pub use error::{CarveError, Result};
pub use record::{parse_record, Record, RecordParser};
pub use sweep::{sweep, SweepReport};
pub use value::{SerialType, Value};

#[cfg(feature = "parallel")]
pub use sweep::par_sweep;
