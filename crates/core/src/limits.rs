//! Display limits passed explicitly into the view-model builders

use serde::{Deserialize, Serialize};

/// Page sizes, link counts, and count caps used when shaping pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLimits {
    pub search_page_size: usize,
    pub max_page_size: usize,
    pub search_link_count: usize,
    /// Search totals at or above this cap are shown as estimates
    pub search_count_limit: usize,
    pub imported_by_page_size: usize,
    pub imported_by_link_count: usize,
    /// Rows fetched for the "imported by" badge on the unit header
    pub imported_by_limit: usize,
    /// Rows fetched for the "imported by" tab
    pub tab_imported_by_limit: usize,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            search_page_size: 10,
            max_page_size: 100,
            search_link_count: 5,
            search_count_limit: 1000,
            imported_by_page_size: 20,
            imported_by_link_count: 7,
            imported_by_limit: 10001,
            tab_imported_by_limit: 20001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let limits: DisplayLimits =
            serde_json::from_str(r#"{"search_page_size": 25}"#).unwrap();
        assert_eq!(limits.search_page_size, 25);
        assert_eq!(limits.max_page_size, 100);
        assert_eq!(limits.imported_by_limit, 10001);
    }
}
