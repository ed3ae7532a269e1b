//! # PEERSCOPE Core
//!
//! Shared infrastructure for the PEERSCOPE similarity-and-anomaly engines:
//!
//! - [`error`] - error taxonomy and `Result` alias
//! - [`domain`] - analytical domain enumeration
//! - [`kernel`] - kernel metadata
//! - [`traits`] - `ComputeKernel` / `BatchKernel` seams
//! - [`registry`] - kernel registry with per-domain statistics
//! - [`matrix`] - dense `SimilarityMatrix` value object and top-k queries
//! - [`entity`] - legal-entity data model (ids, records, disclosures)
//! - [`logging`] - tracing subscriber setup
//!
//! All engines built on this crate are stateless pure functions over their
//! inputs; nothing here holds mutable cross-call state.

#![warn(missing_docs)]

pub mod domain;
pub mod entity;
pub mod error;
pub mod kernel;
pub mod logging;
pub mod matrix;
pub mod registry;
pub mod traits;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::domain::Domain;
    pub use crate::entity::{Disclosure, DisclosureKey, EntityId, EntityRecord, TagSet};
    pub use crate::error::{KernelError, Result};
    pub use crate::kernel::KernelMetadata;
    pub use crate::matrix::{Neighbor, SimilarityMatrix};
    pub use crate::registry::KernelRegistry;
    pub use crate::traits::{BatchKernel, ComputeKernel};
}
