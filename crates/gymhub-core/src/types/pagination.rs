//! Offset pagination for list queries.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 50;
/// Maximum page size.
pub const MAX_LIMIT: u32 = 100;

/// Limit/offset window over a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items returned.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items skipped.
    #[serde(default)]
    pub offset: u32,
}

impl PageRequest {
    /// Create a new page request, clamping the limit to `1..=MAX_LIMIT`.
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset,
        }
    }

    /// Offset as `usize` for slicing in-memory results.
    pub fn offset_usize(&self) -> usize {
        self.offset as usize
    }

    /// Limit as `usize` for slicing in-memory results.
    pub fn limit_usize(&self) -> usize {
        self.limit as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}
