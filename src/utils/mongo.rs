use mongodb::{
    bson::Document,
    Collection,
    Cursor,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Resolves the requested page into `(limit, skip)`. The limit is clamped to
/// `1..=MAX_PAGE_SIZE`; pages start at 1 and page 0 is treated as 1.
pub fn page_window(limit: Option<u32>, page: Option<u32>) -> (u64, u64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as u64;
    let page = page.unwrap_or(1).max(1) as u64;
    (limit, limit.saturating_mul(page - 1))
}

/// `find` sorted newest-first on `sort_field`, one page at a time.
pub async fn find_with_pagination<T>(
    collection: &Collection<T>,
    filter: Document,
    sort_field: &str,
    limit: Option<u32>,
    page: Option<u32>,
) -> mongodb::error::Result<Cursor<T>>
where
    T: Unpin + Send + Sync,
{
    let (limit, skip) = page_window(limit, page);

    let mut sort = Document::new();
    sort.insert(sort_field, -1);

    collection
        .find(filter)
        .sort(sort)
        .limit(limit as i64)
        .skip(skip)
        .await
}

/// Same paging rule over an in-memory, already sorted list.
pub fn page_slice<T: Clone>(items: &[T], limit: Option<u32>, page: Option<u32>) -> Vec<T> {
    let (limit, skip) = page_window(limit, page);
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    items.iter().skip(skip).take(limit as usize).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_start_at_one() {
        let items: Vec<i32> = (1..=5).collect();
        assert_eq!(page_slice(&items, Some(2), None), vec![1, 2]);
        assert_eq!(page_slice(&items, Some(2), Some(0)), vec![1, 2]);
        assert_eq!(page_slice(&items, Some(2), Some(3)), vec![5]);
        assert!(page_slice(&items, Some(2), Some(4)).is_empty());
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(page_window(None, None), (20, 0));
        assert_eq!(page_window(Some(0), Some(1)), (1, 0));
        assert_eq!(page_window(Some(u32::MAX), Some(2)), (100, 100));
        assert_eq!(page_window(Some(u32::MAX), Some(u32::MAX)), (100, 100 * (u32::MAX as u64 - 1)));

        let items: Vec<i32> = (1..=5).collect();
        assert_eq!(page_slice(&items, Some(0), None), vec![1]);
        assert!(page_slice(&items, Some(u32::MAX), Some(u32::MAX)).is_empty());
    }
}
