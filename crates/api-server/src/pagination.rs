use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Query parameters shared by every list endpoint. `search` is only
/// honoured where the resource documents it.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub results: Vec<T>,
}

pub fn paginate<T>(items: Vec<T>, page: Option<usize>, page_size: Option<usize>) -> Page<T> {
    let count = items.len();
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let results = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    Page { count, results }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_first_page() {
        let page = paginate((0..25).collect(), None, None);
        assert_eq!(page.count, 25);
        assert_eq!(page.results, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn pages_are_one_indexed() {
        let page = paginate((0..25).collect(), Some(3), Some(10));
        assert_eq!(page.results, (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_the_count() {
        let page = paginate((0..5).collect::<Vec<i32>>(), Some(4), Some(10));
        assert_eq!(page.count, 5);
        assert!(page.results.is_empty());
    }

    #[test]
    fn page_size_is_clamped() {
        let page = paginate((0..500).collect::<Vec<i32>>(), Some(1), Some(1000));
        assert_eq!(page.results.len(), MAX_PAGE_SIZE);
        let page = paginate((0..5).collect::<Vec<i32>>(), Some(1), Some(0));
        assert_eq!(page.results.len(), 1);
    }
}
