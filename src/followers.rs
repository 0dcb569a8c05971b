use std::ops::Range;

use crate::models::Follower;

/// Followers shown per page.
pub const PAGE_SIZE: usize = 4;

/// Pagination controls only appear once the unfiltered follower count
/// exceeds this many entries.
pub const PAGINATION_THRESHOLD: usize = 4;

/// Narrows the follower list by case-insensitive substring match on login.
///
/// An empty search string returns the full list. `None` models a list that
/// never arrived (fetch failed or still loading) and degrades to an empty
/// result so the render path never has to deal with missing data.
pub fn filter_followers<'a>(followers: Option<&'a [Follower]>, search: &str) -> Vec<&'a Follower> {
    let Some(followers) = followers else {
        return Vec::new();
    };
    let needle = search.to_lowercase();
    followers
        .iter()
        .filter(|follower| follower.login.to_lowercase().contains(&needle))
        .collect()
}

/// Computes the visible window over a filtered list of `len` entries.
///
/// The window is `[(page-1)*size, (page-1)*size + size)` clipped to the
/// list bounds; an out-of-range page yields an empty window.
pub fn page_window(len: usize, page: u32, size: usize) -> Range<usize> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}

/// Number of pages needed to show `len` entries. Zero entries need zero pages.
pub fn page_count(len: usize, size: usize) -> u32 {
    len.div_ceil(size) as u32
}

/// Enabled/visible state of the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Derives the pagination controls from the follower counts.
///
/// Visibility keys off the unfiltered total; the Previous/Next bounds key
/// off the filtered count, the same count the visible window is sliced from.
pub fn pagination_view(total: usize, filtered: usize, page: u32, size: usize) -> PaginationView {
    let window = page_window(filtered, page, size);
    PaginationView {
        visible: total > PAGINATION_THRESHOLD,
        prev_enabled: page > 1,
        next_enabled: window.end < filtered,
    }
}
