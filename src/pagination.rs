// SPDX-License-Identifier: MIT

//! Page-based pagination for list endpoints.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

const MAX_LIMIT: u32 = 100;

/// Query parameters shared by paginated list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageQuery {
    /// Validate and clamp the parameters, returning `(page, limit)`.
    pub fn normalize(&self) -> Result<(u32, u32)> {
        if self.page < 1 {
            return Err(AppError::BadRequest(
                "Page must be greater than 0".to_string(),
            ));
        }
        if self.limit < 1 {
            return Err(AppError::BadRequest(
                "Limit must be greater than 0".to_string(),
            ));
        }
        Ok((self.page, self.limit.min(MAX_LIMIT)))
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> Result<u32> {
        let (page, limit) = self.normalize()?;
        (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_count: u64) -> Self {
        let total_pages = (total_count as f64 / limit as f64).ceil() as u32;
        Self {
            current_page: page,
            total_pages,
            total_count,
            has_next: page < total_pages,
            has_prev: page > 1 && total_count > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page_of_collection() {
        // 25 items, page 2, limit 10: pages 1..=3, both neighbours exist
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.total_count, 25);
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_first_and_last_pages() {
        let first = Pagination::new(1, 10, 25);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_empty_collection() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_page_zero_rejected() {
        let query = PageQuery { page: 0, limit: 10 };
        assert!(matches!(
            query.normalize(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let query = PageQuery {
            page: 1,
            limit: 1000,
        };
        let (_, limit) = query.normalize().unwrap();
        assert_eq!(limit, MAX_LIMIT);
    }

    #[test]
    fn test_offset_overflow_rejected() {
        let query = PageQuery {
            page: u32::MAX,
            limit: 100,
        };
        assert!(matches!(query.offset(), Err(AppError::BadRequest(_))));
    }
}
