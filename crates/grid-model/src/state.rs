//! View state - filters, sort and pagination for one grid.
//!
//! # Architecture
//!
//! Instead of scattering mutable flags across each list view, the state of a
//! grid is one serializable [`ViewState`]. Pipeline stages read it and return
//! fresh vectors; user interactions replace parts of it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rows per page offered to users.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [25, 50, 100, 200];

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

// =============================================================================
// VIEW STATE
// =============================================================================

/// Complete interactive state of one grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub filters: FilterState,
    pub sort: SortState,
    pub pagination: PaginationState,
}

impl ViewState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            pagination: PaginationState::new(page_size),
            ..Default::default()
        }
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Tri-state choice for flag filters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    Yes,
    No,
    #[default]
    Either,
}

impl TriState {
    /// Whether a record with the given flag passes.
    pub fn accepts(self, flag: bool) -> bool {
        match self {
            Self::Yes => flag,
            Self::No => !flag,
            Self::Either => true,
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Either => "either",
        })
    }
}

impl FromStr for TriState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Ok(Self::Yes),
            "no" | "n" | "false" | "0" => Ok(Self::No),
            "" | "either" | "any" | "all" => Ok(Self::Either),
            other => Err(format!("invalid tri-state value '{other}'")),
        }
    }
}

/// Current value of one typed filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FilterValue {
    Exact(String),
    Flag(TriState),
    Bucket(String),
}

impl FilterValue {
    /// Empty values always pass and are not stored.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Exact(value) | Self::Bucket(value) => value.trim().is_empty(),
            Self::Flag(state) => *state == TriState::Either,
        }
    }
}

/// Free-text term plus typed filter values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    term: String,
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term (stored trimmed and lowercased).
    #[must_use]
    pub fn with_term(mut self, term: &str) -> Self {
        self.set_term(term);
        self
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn set_term(&mut self, term: &str) {
        self.term = term.trim().to_lowercase();
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Set a filter value; empty values clear the entry.
    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) {
        let key = key.into();
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn clear_all(&mut self) {
        self.term.clear();
        self.values.clear();
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Active (non-empty) typed filters.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty() && self.active().next().is_none()
    }
}

// =============================================================================
// SORT
// =============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active sort column and direction. `column: None` keeps filter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    /// Header click: the active column toggles direction, another column
    /// becomes active in ascending order.
    pub fn click(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        self.column = None;
        self.direction = SortDirection::Asc;
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Page size and requested page (1-indexed).
///
/// Totals and window bounds are always derived from the current result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationState {
    pub page_size: usize,
    pub current_page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Page size, never zero.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Request a page; values below 1 are clamped to 1. The upper bound is
    /// applied when the page is computed.
    pub fn go_to(&mut self, page: i64) {
        self.current_page = usize::try_from(page.max(1)).unwrap_or(1);
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.effective_page_size()).max(1)
    }

    /// Current page clamped into `[1, total_pages]`.
    pub fn clamped_page(&self, count: usize) -> usize {
        self.current_page.clamp(1, self.total_pages(count))
    }
}
