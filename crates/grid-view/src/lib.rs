//! The resource grid pipeline.
//!
//! A grid is normalized records pushed through pure stages that each return a
//! fresh vector:
//!
//! ```text
//! records -> apply_filters -> sort_records -> paginate -> visible columns
//! ```
//!
//! [`GridSession`] owns one grid's records and [`ViewState`](grid_model::ViewState),
//! drives the background fetch, and exposes the computed [`GridView`].

pub mod aggregate;
pub mod columns;
pub mod fetch;
pub mod filter;
pub mod pagination;
pub mod session;
pub mod sort;

pub use aggregate::{Summation, ValueCount, count_by, sum_field};
pub use columns::{COLUMN_NAMESPACE_PREFIX, ColumnVisibility, column_namespace};
pub use fetch::{FetchHandle, FetchUpdate, spawn_fetch};
pub use filter::{apply_filters, filter_options, haystack};
pub use pagination::{Page, page_strip, paginate};
pub use session::{GridSession, GridView, LoadState};
pub use sort::{compare_keys, sort_records};
