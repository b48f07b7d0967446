//! Resource catalog for the inventory grids.
//!
//! Each collected resource type is described by one [`GridSchema`] built from
//! the field descriptors in [`grid_model`]. The schemas are grouped by
//! [`Category`] and served from a [`CatalogRegistry`] with case-insensitive
//! lookup.
//!
//! ```
//! use grid_catalog::CatalogRegistry;
//!
//! let registry = CatalogRegistry::shared();
//! let schema = registry.get("ec2instance").unwrap();
//! assert_eq!(schema.resource_type, "EC2Instance");
//! ```
//!
//! [`GridSchema`]: grid_model::GridSchema

pub mod backup;
pub mod compute;
pub mod database;
pub mod envelope;
pub mod networking;
mod registry;
pub mod storage;

pub use envelope::with_envelope;
pub use registry::{CatalogEntry, CatalogRegistry, Category};
