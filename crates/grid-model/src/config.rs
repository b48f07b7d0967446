//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_PAGE_SIZE;

/// Default number of page buttons in the page strip.
pub const DEFAULT_PAGE_STRIP_CAP: usize = 7;

/// Tunables shared by every grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows per page for new grids.
    pub page_size: usize,
    /// Maximum page numbers shown in the page strip.
    pub page_strip_cap: usize,
    /// Whether changing the sort returns to the first page.
    pub reset_page_on_sort: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_strip_cap: DEFAULT_PAGE_STRIP_CAP,
            reset_page_on_sort: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: GridConfig = serde_json::from_str(r#"{"page_size": 100}"#).unwrap();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.page_strip_cap, DEFAULT_PAGE_STRIP_CAP);
        assert!(config.reset_page_on_sort);
    }
}
