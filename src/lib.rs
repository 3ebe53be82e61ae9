//! # pipeline-registry
//!
//! An embedded, transactional registry of versioned pipeline assets: a
//! catalog of named assets, their published versions, the dependency DAG
//! between versions, and a small state machine tracking whether each
//! version's payload data has been computed yet.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pipeline_registry::registry::Registry;
//! use pipeline_registry::store::types::AssetRecord;
//! use pipeline_registry::store::Store;
//!
//! # fn main() -> pipeline_registry::error::Result<()> {
//! let store = Store::open("registry.db")?;
//! let registry = Registry::new(store);
//!
//! let asset = registry.create_asset(
//!     "generic",
//!     AssetRecord {
//!         path_id: String::new(),
//!         name: "ShotA_Plate".to_string(),
//!         description: String::new(),
//!         type_name: String::new(),
//!     },
//! )?;
//! # let _ = asset;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`store`] — the transactional SQLite-backed catalog; the center of
//!   gravity of the crate.
//! - [`registry`] — read-through `Asset`/`AssetVersion` handles over the
//!   store, plus the template-cascade engine.
//! - [`scheduler`] — the contract to an external compute backend.
//! - [`resolver`] — `protocol:path[?query]` URI dispatch with
//!   environment-lock semantics.
//! - [`asset_types`] — the `type_name -> factory` dispatch table.
//! - [`version`], [`uri`], [`future`], [`task_params`] — small
//!   self-contained value types used throughout the above.

pub mod asset_types;
pub mod env;
pub mod error;
pub mod future;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod store;
pub mod task_params;
pub mod uri;
pub mod version;

pub use error::{PipelineError, Result};
pub use registry::{Asset, AssetVersion, Registry};
pub use store::Store;
