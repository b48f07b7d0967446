//! Library components of the `inventory-grid` command-line host.
//!
//! The binary wires the grid engine to local collaborators: a directory of
//! JSON listings as the resource store, a TOML file for column preferences
//! and a directory sink for exports.

pub mod logging;
pub mod prefs;
pub mod query;
pub mod settings;
pub mod sink;
pub mod store;

pub use prefs::FilePreferences;
pub use settings::Settings;
pub use sink::DirectorySink;
pub use store::JsonDirStore;
