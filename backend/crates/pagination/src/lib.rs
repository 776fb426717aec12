//! Fixed-size pagination for listing endpoints.
//!
//! Listings page through results five records at a time. [`PageRequest`]
//! names a zero-based page, [`Page`] wraps one page of items together with
//! the total page count, and [`SortDirection`] carries the requested sort
//! order from the wire down to the repositories.

use serde::{Deserialize, Serialize};

/// Number of records served per page.
pub const PAGE_SIZE: u32 = 5;

/// A request for one zero-based page of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
}

impl PageRequest {
    /// Request the given zero-based page.
    #[must_use]
    pub const fn new(page: u32) -> Self {
        Self { page }
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Number of records to skip before this page starts.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page) * u64::from(PAGE_SIZE)
    }
}

/// One page of a listing plus the page arithmetic needed to render
/// pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page, at most [`PAGE_SIZE`] of them.
    pub items: Vec<T>,
    /// Zero-based index of this page.
    pub page: u32,
    /// Total pages for the filtered result set; zero when it is empty.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Wrap a loaded page, deriving the page count from the total number
    /// of matching records.
    #[must_use]
    pub fn from_total(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let pages = total_items.div_ceil(u64::from(PAGE_SIZE));
        Self {
            items,
            page: request.page(),
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    /// A page with no items and a zero page count.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            page: request.page(),
            total_pages: 0,
        }
    }

    /// Transform the items while keeping the page arithmetic intact.
    #[must_use]
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(transform).collect(),
            page: self.page,
            total_pages: self.total_pages,
        }
    }

    /// True when this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Direction applied to a listing's sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order, the listing default.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for SortDirection {
    type Err = SortDirectionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(SortDirectionParseError::new(value))
        }
    }
}

/// Raised when a sort order parameter is neither `asc` nor `desc`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sort order must be `asc` or `desc`, got `{value}`")]
pub struct SortDirectionParseError {
    value: String,
}

impl SortDirectionParseError {
    /// Record the rejected value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The rejected value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
