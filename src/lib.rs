//! understory: Sample-by-variable data storage for random forests.
//!
//! Dense matrices over a flat value buffer that is either owned by the
//! matrix or borrowed from the caller, with narrow storage types for
//! memory-efficient training data.
//!
//! # Key Types
//!
//! - [`SampleMatrix`] - Dense matrix over an owned or borrowed buffer
//! - [`Dataset`] / [`DatasetBuilder`] - Matrix plus per-variable schema
//! - [`Schema`] / [`VariableMeta`] - Variable names and types
//! - [`ValueIndex`] - Per-variable distinct values and ranks
//! - [`Element`] - Storage types (`f64`, `f32`, `u8`, `i8`)
//!
//! # Ownership
//!
//! Every matrix knows whether it owns its buffer ([`ValueBuffer::Owned`])
//! or borrows it ([`ValueBuffer::Borrowed`]). Borrowed memory is never
//! freed and never written: mutation promotes the buffer to an owned copy
//! first. See the [`storage`] module for details.
//!
//! # Building a Dataset
//!
//! Use [`Dataset::builder()`] to assemble variables column by column, or
//! [`Dataset::from_slice`] to wrap caller-owned memory without copying.
//! See the [`dataset`] module for details.

// Re-export approx traits for users who want to compare stored values
pub use approx;

pub mod dataset;
pub mod element;
pub mod error;
pub mod index;
pub mod layout;
pub mod matrix;
pub mod schema;
pub mod storage;
pub mod testing;
pub mod utils;

mod interop;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Core storage types
pub use matrix::{SampleMatrix, ValueAccessor};
pub use storage::ValueBuffer;

// Memory layouts
pub use layout::{ColMajor, Layout, RowMajor, StridedIter};

// Dataset types (matrix + schema)
pub use dataset::{Dataset, DatasetBuilder};
pub use schema::{Schema, VariableMeta, VariableType};

// Value index (distinct values and ranks, for split finding)
pub use index::ValueIndex;

// Storage element types
pub use element::Element;

// Errors
pub use error::DataError;

// Shared utilities
pub use utils::{Parallelism, run_with_threads};
