//! Filtering, ordering and paging of the public post listing.

use super::{Post, PostCollection};

/// Posts shown per page on the home listing.
pub const POSTS_PER_PAGE: usize = 6;

/// One page of results plus the numbers needed to render pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number that was requested.
    pub page: usize,
    /// Number of pages, `ceil(total / per_page)`; 0 when there are no items.
    pub last_page: usize,
    pub total: usize,
}

/// Posts visible to the caller, newest first.
///
/// Non-admins only see published posts. A non-empty `query` keeps posts whose
/// title or content contains it, ignoring case.
#[must_use]
pub fn visible_posts(posts: &PostCollection, is_admin: bool, query: Option<&str>) -> Vec<Post> {
    let needle = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut visible: Vec<Post> = posts
        .iter()
        .filter(|p| is_admin || p.published)
        .filter(|p| {
            needle.as_deref().map_or(true, |q| {
                p.title.to_lowercase().contains(q) || p.content.to_lowercase().contains(q)
            })
        })
        .cloned()
        .collect();

    visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    visible
}

/// Slice `items` into the 1-indexed `page` of size `per_page`.
///
/// Pages past the end come back empty with the real `last_page`.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let last_page = total.div_ceil(per_page);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        last_page,
        total,
    }
}
