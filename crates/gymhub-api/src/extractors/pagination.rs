//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};
use validator::Validate;

use gymhub_core::types::pagination::{DEFAULT_LIMIT, PageRequest};

/// Query parameters of the conversation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConversationPageParams {
    /// Messages per page (default: 50, max: 100).
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u32,
    /// Messages to skip (default: 0).
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ConversationPageParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ConversationPageParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}
