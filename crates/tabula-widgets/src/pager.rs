//! Page arithmetic and page-button layout for the data table.
//!
//! Pages are 1-based everywhere in the public API. The button layout works
//! over 0-based page *indices* (`0..page_count`), with the button for index
//! `i` labelled `i + 1`.

use crate::error::TableError;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::ops::Range;

/// Above this many pages, runs of page buttons collapse into ellipses.
pub const COLLAPSE_THRESHOLD: usize = 8;

/// How a single page index renders in the button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    /// A clickable button for the given 1-based page.
    Button(usize),
    /// The marker standing in for a collapsed run of pages.
    Ellipsis,
    /// Part of a collapsed run after its marker; renders nothing.
    Hidden,
}

/// Pagination state over `total` records.
///
/// # Example
///
/// ```ignore
/// let mut pager = Pager::new(25, 10);
/// pager.set_page(3)?;
/// assert_eq!((pager.from_record(), pager.to_record()), (21, 25));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    limit: usize,
    total: usize,
}

impl Pager {
    /// Create a pager on page 1. A zero `limit` is raised to 1.
    pub fn new(total: usize, limit: usize) -> Self {
        Self {
            current_page: 1,
            limit: limit.max(1),
            total,
        }
    }

    /// Current page (1-based).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Records per page.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Total record count.
    pub fn total(&self) -> usize {
        self.total
    }

    /// `ceil(total / limit)`; zero for an empty dataset.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.limit)
    }

    /// First record shown, 1-based.
    pub fn from_record(&self) -> usize {
        if self.current_page == 1 {
            1
        } else {
            (self.current_page - 1) * self.limit + 1
        }
    }

    /// Last record shown, 1-based and inclusive.
    pub fn to_record(&self) -> usize {
        (self.current_page * self.limit).min(self.total)
    }

    /// The current page as a half-open, 0-based index range.
    ///
    /// Empty when the dataset is empty.
    pub fn range(&self) -> Range<usize> {
        let end = self.to_record();
        let start = (self.from_record() - 1).min(end);
        start..end
    }

    /// The records of the current page.
    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        let Range { start, end } = self.range();
        let end = end.min(data.len());
        &data[start.min(end)..end]
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count()
    }

    /// Whether `page` can be requested. Page 1 is always valid, even when
    /// there are no records.
    pub fn is_valid_page(&self, page: usize) -> bool {
        page >= 1 && page <= self.page_count().max(1)
    }

    /// Move to `page`.
    pub fn set_page(&mut self, page: usize) -> Result<(), TableError> {
        if !self.is_valid_page(page) {
            return Err(TableError::PageOutOfRange {
                page,
                page_count: self.page_count(),
            });
        }
        self.current_page = page;
        Ok(())
    }

    /// Advance one page if not on the last page.
    pub fn next_page(&mut self) {
        if self.has_next() {
            self.current_page += 1;
        }
    }

    /// Go back one page if not on the first page.
    pub fn prev_page(&mut self) {
        if self.has_previous() {
            self.current_page -= 1;
        }
    }

    /// Jump to page 1.
    pub fn first_page(&mut self) {
        self.current_page = 1;
    }

    /// Jump to the last page (page 1 when there are no records).
    pub fn last_page(&mut self) {
        self.current_page = self.page_count().max(1);
    }

    /// Change the page size and return to page 1.
    pub fn set_limit(&mut self, limit: usize) -> Result<(), TableError> {
        if limit == 0 {
            return Err(TableError::InvalidPageSize);
        }
        self.limit = limit;
        self.current_page = 1;
        Ok(())
    }

    /// Change the record count, clamping the current page into range.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.current_page = self.current_page.clamp(1, self.page_count().max(1));
    }

    /// Button classification for every page index.
    pub fn slots(&self) -> Vec<PageSlot> {
        page_slots(self.current_page, self.page_count())
    }

    /// Render the button row as a single line: `‹ 1 … 5 [6] 7 … 12 ›`.
    pub fn nav_line(&self, style: &PagerStyle) -> Line<'static> {
        let arrow = |enabled: bool| if enabled { style.arrow } else { style.disabled };
        let mut spans = vec![Span::styled("‹", arrow(self.has_previous()))];
        for slot in self.slots() {
            match slot {
                PageSlot::Button(page) if page == self.current_page => {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(format!("[{page}]"), style.current));
                }
                PageSlot::Button(page) => {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(page.to_string(), style.page));
                }
                PageSlot::Ellipsis => {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled("…", style.ellipsis));
                }
                PageSlot::Hidden => {}
            }
        }
        spans.push(Span::raw(" "));
        spans.push(Span::styled("›", arrow(self.has_next())));
        Line::from(spans)
    }
}

/// Styles for [`Pager::nav_line`].
#[derive(Debug, Clone, Default)]
pub struct PagerStyle {
    /// Plain page buttons.
    pub page: Style,
    /// The current page button.
    pub current: Style,
    /// Ellipsis markers.
    pub ellipsis: Style,
    /// Enabled prev/next arrows.
    pub arrow: Style,
    /// Disabled prev/next arrows.
    pub disabled: Style,
}

/// The three candidate collapsed runs, in priority order: middle, start, end.
///
/// Each is a half-open range of 0-based page indices and may be empty.
pub fn collapsed_ranges(current_page: usize, page_count: usize) -> [Range<usize>; 3] {
    if page_count <= COLLAPSE_THRESHOLD {
        return [0..0, 0..0, 0..0];
    }
    let near_edge = current_page <= 2 || current_page >= page_count - 1;
    let middle = if near_edge { 3..page_count - 3 } else { 0..0 };

    let start = if current_page <= 3 || current_page >= page_count - 1 {
        0..0
    } else {
        1..current_page - 2
    };

    let end = if current_page > 2 && current_page < page_count {
        current_page + 1..page_count - 1
    } else {
        0..0
    };

    [middle, start, end]
}

/// Classify every page index `0..page_count` as a button, an ellipsis marker
/// or hidden.
///
/// For each index the collapsed runs are consulted in priority order; the
/// first non-empty run containing the index decides. Its first index becomes
/// the ellipsis and the rest are hidden.
pub fn page_slots(current_page: usize, page_count: usize) -> Vec<PageSlot> {
    let ranges = collapsed_ranges(current_page, page_count);
    (0..page_count)
        .map(|index| {
            ranges
                .iter()
                .filter(|r| !r.is_empty())
                .find(|r| r.contains(&index))
                .map_or(PageSlot::Button(index + 1), |r| {
                    if index == r.start {
                        PageSlot::Ellipsis
                    } else {
                        PageSlot::Hidden
                    }
                })
        })
        .collect()
}
