//! Page window over a table.

use crate::error::AdminError;

/// `page_number` is zero-based; `offset = page_number * page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_number: u64,
    page_size: u64,
}

impl Pagination {
    pub fn new(page_number: u64, page_size: u64) -> Result<Self, AdminError> {
        if page_size == 0 {
            return Err(AdminError::invalid("document_per_page must be positive"));
        }
        let page = Self {
            page_number,
            page_size,
        };
        // Both values are bound as BIGINT.
        let offset = page
            .page_number
            .checked_mul(page.page_size)
            .filter(|o| i64::try_from(*o).is_ok());
        if offset.is_none() || i64::try_from(page_size).is_err() {
            return Err(AdminError::invalid("page window is out of range"));
        }
        Ok(page)
    }

    /// Parse the raw query-string values, enforcing an upper bound on the page size.
    pub fn parse(page_number: &str, page_size: &str, max_page_size: u64) -> Result<Self, AdminError> {
        let page_number: u64 = page_number
            .trim()
            .parse()
            .map_err(|_| AdminError::invalid("unable to parse page_number"))?;
        let page_size: u64 = page_size
            .trim()
            .parse()
            .map_err(|_| AdminError::invalid("unable to parse document_per_page"))?;
        if page_size > max_page_size {
            return Err(AdminError::InvalidArgument(format!(
                "document_per_page must not exceed {max_page_size}"
            )));
        }
        Self::new(page_number, page_size)
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        // Checked in `new`.
        self.page_size as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page_number * self.page_size) as i64
    }
}
