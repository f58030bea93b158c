//! Pagination request parameters and response wrapper.

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending (the default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

/// Parameters for a paginated query.
///
/// `page` is 1-indexed and `page_size` is bounded by [`MAX_PAGE_SIZE`]. The bounds are enforced by
/// [`PaginationParams::new`] and by deserialization.
///
/// # Examples
///
/// ```rust
/// use monorepo_shared::PaginationParams;
///
/// let params = PaginationParams::new(3, 10).unwrap();
/// assert_eq!(params.offset(), 20);
///
/// assert!(PaginationParams::new(0, 10).is_err());
/// assert!(PaginationParams::new(1, 101).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPaginationParams")]
pub struct PaginationParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
    /// Field to sort by
    pub sort_by: Option<String>,
    /// Sort order
    pub sort_order: SortOrder,
}

impl PaginationParams {
    /// Create validated parameters with no sorting.
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        let params = Self {
            page,
            page_size,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Sort by `field` in the given order.
    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    /// Check the page and page size bounds.
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(AppError::validation(
                "page must be greater than or equal to 1",
                Some("page"),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::validation(
                format!("page_size must be between 1 and {MAX_PAGE_SIZE}"),
                Some("page_size"),
            ));
        }
        Ok(())
    }

    /// Number of items to skip for this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: SortOrder::Asc,
        }
    }
}

#[derive(Deserialize)]
struct RawPaginationParams {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default)]
    sort_by: Option<String>,
    #[serde(default)]
    sort_order: SortOrder,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl TryFrom<RawPaginationParams> for PaginationParams {
    type Error = AppError;

    fn try_from(raw: RawPaginationParams) -> Result<Self> {
        let params = Self {
            page: raw.page,
            page_size: raw.page_size,
            sort_by: raw.sort_by,
            sort_order: raw.sort_order,
        };
        params.validate()?;
        Ok(params)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Total number of pages
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Build a page from its items, the overall total, and the request parameters.
    pub fn create(items: Vec<T>, total: u64, params: &PaginationParams) -> Self {
        let page_size = u64::from(params.page_size.max(1));
        Self {
            items,
            total,
            page: params.page,
            page_size: params.page_size,
            total_pages: total.div_ceil(page_size),
        }
    }

    /// Whether there is a page after this one.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    /// Whether there is a page before this one.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Transform the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}
