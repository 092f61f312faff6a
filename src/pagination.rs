use serde::Serialize;

use crate::controller::list::{ListController, ListResource};

/// Page numbers to render, `None` standing for an ellipsis gap.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One page of rows plus everything the pagination bar needs.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// "Showing `first` to `last` of `total`", when the total is known.
    pub total: Option<usize>,
    pub first: usize,
    pub last: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            first: 0,
            last: 0,
            total: None,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
            items,
            pages,
            page: current_page,
            total_pages,
        }
    }

    /// Adds the "showing x to y of total" range.
    pub fn with_total(mut self, total: Option<usize>, page_size: usize) -> Self {
        if let Some(total) = total.filter(|t| *t > 0) {
            self.first = (self.page - 1)
                .saturating_mul(page_size)
                .saturating_add(1)
                .min(total);
            self.last = (self.first + self.items.len()).saturating_sub(1).min(total);
        }
        self.total = total;
        self
    }
}

impl<T: Clone> Paginated<T> {
    /// Snapshot of a loaded list for rendering.
    pub fn from_list<R>(list: &ListController<R>, local_filter: bool) -> Self
    where
        R: ListResource<Record = T>,
    {
        let items = list.visible_items(local_filter).into_iter().cloned().collect();
        Self::new(items, list.page(), list.total_pages()).with_total(list.total(), list.page_size())
    }
}
