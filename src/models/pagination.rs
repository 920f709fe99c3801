use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl PaginationQuery {
    pub fn new(page: usize, per_page: usize) -> Self {
        let mut query = Self { page, per_page };
        query.validate();
        query
    }

    pub fn validate(&mut self) {
        if self.page < 1 {
            self.page = 1;
        }
        if self.per_page < 1 || self.per_page > 100 {
            self.per_page = default_per_page();
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub current_page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PaginationMeta {
    pub fn new(current_page: usize, per_page: usize, total_items: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total_items == 0 {
            1
        } else {
            (total_items + per_page - 1) / per_page
        };

        Self {
            current_page,
            per_page,
            total_items,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Slice one page out of an already-filtered list. Pages past the end are
/// clamped to the last page.
pub fn paginate<T: Clone>(items: &[T], query: PaginationQuery) -> Paginated<T> {
    let mut query = query;
    query.validate();
    let total_pages = PaginationMeta::new(1, query.per_page, items.len()).total_pages;
    query.page = query.page.min(total_pages);

    let data = items
        .iter()
        .skip(query.offset())
        .take(query.per_page)
        .cloned()
        .collect();

    Paginated {
        data,
        pagination: PaginationMeta::new(query.page, query.per_page, items.len()),
    }
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    10
}
