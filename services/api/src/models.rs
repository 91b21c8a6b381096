//! API models for request and response payloads

use common::models::{Page, PageView, ServiceRecord};
use serde::{Deserialize, Serialize};

/// Page size of the dashboard services grid
pub const DEFAULT_PAGE_SIZE: u32 = 9;

const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for the services listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub size: Option<u32>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// Response for the services listing
#[derive(Debug, Serialize)]
pub struct ServicesListing {
    pub page: Page<ServiceRecord>,
    pub view: PageView,
}

impl From<Page<ServiceRecord>> for ServicesListing {
    fn from(page: Page<ServiceRecord>) -> Self {
        let view = page.view();
        ServicesListing { page, view }
    }
}
