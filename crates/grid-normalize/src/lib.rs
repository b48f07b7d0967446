//! Shape unification for raw resource records.
//!
//! Upstream collectors emit the same logical field in several shapes: tags as
//! a list of `{Key, Value}` pairs, a plain object, or a JSON string of either;
//! identifier lists as arrays, delimited strings or objects; sizes as human
//! strings such as `59.28 TB`. The [`Normalizer`] decodes each declared field
//! of a [`GridSchema`](grid_model::GridSchema) through a per-kind fallback
//! chain and never fails: malformed input degrades to the kind's default and
//! emits a `tracing` diagnostic.
//!
//! # Example
//!
//! ```
//! use grid_model::{FieldDescriptor, FieldValue, GridSchema};
//! use grid_normalize::Normalizer;
//! use serde_json::json;
//!
//! let schema = GridSchema::new("RDSInstance", "RDS Instances")
//!     .field(FieldDescriptor::tags("tags", "Tags"));
//! let raw = json!({"tags": "[{\"Key\":\"Name\",\"Value\":\"db-1\"}]"});
//! let record = Normalizer::new(&schema).normalize(raw.as_object().unwrap());
//! assert_eq!(record.get("tags").display_text(), "Name=db-1");
//! ```

pub mod normalization;
mod normalizer;

pub use normalization::Decoded;
pub use normalizer::{NormalizeReport, Normalizer, normalize};
