/// One page of an ordered result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub has_more: bool,
}

/// Slices `items` to `[offset, offset + limit)`. An offset past the end
/// yields an empty page.
#[must_use]
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let has_more = total > offset.saturating_add(limit);
    let items = items.into_iter().skip(offset).take(limit).collect();
    Page {
        items,
        total,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_many() {
        let page = paginate((0..45).collect::<Vec<_>>(), 0, 20);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total, 45);
        assert!(page.has_more);
    }

    #[test]
    fn last_partial_page() {
        let page = paginate((0..45).collect::<Vec<_>>(), 40, 20);
        assert_eq!(page.items, vec![40, 41, 42, 43, 44]);
        assert!(!page.has_more);
    }

    #[test]
    fn exact_fit_has_no_more() {
        let page = paginate((0..20).collect::<Vec<_>>(), 0, 20);
        assert_eq!(page.items.len(), 20);
        assert!(!page.has_more);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], 10, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn huge_offset_does_not_overflow() {
        let page = paginate(vec![1], usize::MAX, 100);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }
}
