//! Page-window arithmetic shared by paginated listings.
//!
//! # Invariants
//! - `page_size >= 1` is guaranteed by the type; a zero size cannot reach here.
//! - A page past the end yields an empty window, never an error.

use serde::Serialize;
use std::num::NonZeroU32;

/// First page number.
pub const DEFAULT_PAGE_NUMBER: u32 = 1;
/// Page size used when the caller supplies none or a non-positive one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized page request: both values are at least 1, size capped at
/// [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: NonZeroU32,
    pub page_size: NonZeroU32,
}

impl PageRequest {
    /// Clamps raw caller input: `page_number < 1 -> 1`, `page_size < 1 -> 10`,
    /// `page_size > 100 -> 100`.
    pub fn normalize(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        let page_number = page_number
            .filter(|value| *value >= 1)
            .map_or(DEFAULT_PAGE_NUMBER, |value| {
                u32::try_from(value).unwrap_or(u32::MAX)
            });
        let page_size = match page_size {
            Some(value) if value > i64::from(MAX_PAGE_SIZE) => MAX_PAGE_SIZE,
            Some(value) if value >= 1 => value as u32,
            _ => DEFAULT_PAGE_SIZE,
        };
        Self {
            page_number: NonZeroU32::new(page_number).unwrap_or(NonZeroU32::MIN),
            page_size: NonZeroU32::new(page_size).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::normalize(None, None)
    }
}

/// Window bounds and navigation flags for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
    /// Inclusive start offset into the ordered collection.
    pub start: u64,
    /// Exclusive end offset; equal to `start` when the page is past the end.
    pub end: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageWindow {
    pub fn compute(total_count: u64, page: PageRequest) -> Self {
        let page_number = page.page_number.get();
        let page_size = page.page_size.get();
        let size = u64::from(page_size);
        let total_pages = total_count.div_ceil(size);

        let start = (u64::from(page_number) - 1)
            .saturating_mul(size)
            .min(total_count);
        let end = start.saturating_add(size).min(total_count);

        Self {
            total_count,
            page_number,
            page_size,
            total_pages,
            start,
            end,
            has_previous_page: page_number > 1,
            has_next_page: u64::from(page_number) < total_pages,
        }
    }

    /// Number of items this window covers.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One page of an ordered collection plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResult<T> {
    pub fn from_window(window: PageWindow, items: Vec<T>) -> Self {
        Self {
            items,
            total_count: window.total_count,
            page_number: window.page_number,
            page_size: window.page_size,
            total_pages: window.total_pages,
            has_previous_page: window.has_previous_page,
            has_next_page: window.has_next_page,
        }
    }
}
