use std::num::NonZeroUsize;

use chrono::NaiveDate;

use crate::catalog::{
    entities::Dated,
    errors::{Error, Result},
};

/// 4 cards per row, 8 rows.
pub const DEFAULT_PAGE_SIZE: usize = 32;

/// Splits the feed into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroUsize,
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator {
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl Paginator {
    /// Fails on a zero page size.
    pub fn new(page_size: usize) -> Result<Self> {
        let page_size = NonZeroUsize::new(page_size).ok_or_else(|| {
            Error::ConfigurationError("page size must be greater than zero".into())
        })?;
        Ok(Paginator { page_size })
    }

    /// Items per page.
    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Zero for an empty feed.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size.get())
    }

    /// Items shown on page `index` (0-based). Out of range pages are empty.
    pub fn page<'a, T>(&self, items: &'a [T], index: usize) -> &'a [T] {
        let Some(start) = index.checked_mul(self.page_size.get()) else {
            return &[];
        };
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size.get()).min(items.len());
        &items[start..end]
    }

    /// Page `index` regrouped into date sections.
    ///
    /// A feed without items still has a single (empty) first page so the home
    /// page can render its empty state.
    pub fn view<'a, T: Dated>(&self, items: &'a [T], index: usize) -> Option<PageView<'a, T>> {
        let total_pages = self.total_pages(items.len());
        if index >= total_pages.max(1) {
            return None;
        }
        Some(PageView {
            index,
            total_pages,
            total_items: items.len(),
            sections: group_by_date(self.page(items, index)),
        })
    }
}

/// Releases of one day on a feed page.
#[derive(Debug, PartialEq)]
pub struct DateSection<'a, T> {
    /// Day shared by every item.
    pub date: NaiveDate,
    /// In feed order.
    pub items: Vec<&'a T>,
}

/// Groups `items` by date, newest section first. Items keep their relative
/// order inside a section.
pub fn group_by_date<T: Dated>(items: &[T]) -> Vec<DateSection<'_, T>> {
    let mut sections: Vec<DateSection<'_, T>> = Vec::new();
    for item in items {
        let date = item.date();
        match sections.iter_mut().find(|section| section.date == date) {
            Some(section) => section.items.push(item),
            None => sections.push(DateSection {
                date,
                items: vec![item],
            }),
        }
    }
    sections.sort_by(|a, b| b.date.cmp(&a.date));
    sections
}

/// One rendered page of the home feed.
#[derive(Debug)]
pub struct PageView<'a, T> {
    /// 0-based page index.
    pub index: usize,
    /// Number of pages, zero for an empty feed.
    pub total_pages: usize,
    /// Items in the whole feed, not just this page.
    pub total_items: usize,
    /// Newest day first.
    pub sections: Vec<DateSection<'a, T>>,
}

impl<T> PageView<'_, T> {
    /// Whether the page shows no releases.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Index of the previous page, none on the first.
    pub fn previous(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    /// Index of the next page, none on the last.
    pub fn next(&self) -> Option<usize> {
        let next = self.index + 1;
        (next < self.total_pages).then_some(next)
    }

    /// Whether the Previous / Next controls are shown at all.
    pub fn has_navigation(&self) -> bool {
        self.total_pages > 1
    }
}

/// Site path of a home feed page: `/` for the first, `/page/<n>/` after.
pub fn page_path(index: usize) -> String {
    if index == 0 {
        "/".to_string()
    } else {
        format!("/page/{}/", index + 1)
    }
}
