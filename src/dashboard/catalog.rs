use crate::core::contains_ignore_case;
use crate::models::{paginate, Paginated, PaginationQuery, Scholarship};

pub const CATALOG_PAGE_SIZE: usize = 9;

/// Search box and pager state of the scholarship catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    term: String,
    page: usize,
    per_page: usize,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new(CATALOG_PAGE_SIZE)
    }
}

impl CatalogView {
    pub fn new(per_page: usize) -> Self {
        Self {
            term: String::new(),
            page: 1,
            per_page,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// A new search always starts over on the first page.
    pub fn search(&mut self, term: &str) {
        self.term = term.trim().to_string();
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn render(&self, scholarships: &[Scholarship]) -> Paginated<Scholarship> {
        let matches = filter_scholarships(scholarships, &self.term);
        paginate(&matches, PaginationQuery::new(self.page, self.per_page))
    }
}

/// Case-insensitive match on scholarship name, university or degree.
pub fn filter_scholarships(scholarships: &[Scholarship], term: &str) -> Vec<Scholarship> {
    let term = term.trim();
    scholarships
        .iter()
        .filter(|s| {
            term.is_empty()
                || contains_ignore_case(&s.name, term)
                || contains_ignore_case(&s.university_name, term)
                || contains_ignore_case(s.degree.label(), term)
        })
        .cloned()
        .collect()
}
