//! Wire models of the salon API

use serde::{Deserialize, Serialize};

/// Service record as stored upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Payload for creating or updating a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Sort flags reported by the upstream pager
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub unsorted: bool,
    pub sorted: bool,
    pub empty: bool,
}

/// Request window of a page; `page_number` is zero-based
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(default)]
    pub sort: Sort,
    pub offset: u64,
    pub paged: bool,
    pub unpaged: bool,
}

/// One page of records plus the pagination metadata computed upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub total_pages: u32,
    pub total_elements: u64,
    pub last: bool,
    pub number_of_elements: u32,
    pub size: u32,
    pub number: u32,
    #[serde(default)]
    pub sort: Sort,
    pub first: bool,
    pub empty: bool,
}

/// Display projection of a page: one-based page number and navigation flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn view(&self) -> PageView {
        let current_page = self.pageable.page_number.saturating_add(1);
        PageView {
            current_page,
            total_pages: self.total_pages,
            has_previous: current_page > 1,
            has_next: current_page < self.total_pages,
        }
    }
}

/// Credentials posted to the upstream `auth/login` resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
}

/// Upstream answer to a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
