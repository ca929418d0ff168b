//! Skip/limit windows for list queries.

use serde::{Deserialize, Serialize};

/// Default number of items returned by list endpoints.
const DEFAULT_LIMIT: i64 = 50;
/// Maximum number of items a single request may ask for.
const MAX_LIMIT: i64 = 100;

/// A skip/limit window over an ordered collection.
///
/// Values are clamped on construction so repositories can bind them into
/// SQL `OFFSET`/`LIMIT` without further checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListRange {
    /// Number of leading items to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl ListRange {
    /// Create a clamped range.
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// The SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        self.skip.max(0)
    }

    /// The SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

impl Default for ListRange {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_negative_skip() {
        let range = ListRange::new(-5, 20);
        assert_eq!(range.offset(), 0);
        assert_eq!(range.limit(), 20);
    }

    #[test]
    fn test_clamps_limit_bounds() {
        assert_eq!(ListRange::new(0, 0).limit(), 1);
        assert_eq!(ListRange::new(0, 10_000).limit(), MAX_LIMIT);
    }

    #[test]
    fn test_default_window() {
        let range = ListRange::default();
        assert_eq!(range.offset(), 0);
        assert_eq!(range.limit(), DEFAULT_LIMIT);
    }
}
