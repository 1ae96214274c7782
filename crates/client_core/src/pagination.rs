//! Page-number strip shown under the grid.

const SHOW_PAGES: i64 = 5;
const SIDE_PAGES: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(i64),
    Ellipsis,
}

/// Page numbers to offer around `current`: everything when there are at most
/// five pages, otherwise the first and last page plus a window of two on each
/// side of `current`, widened at the edges and separated by ellipses.
pub fn page_window(current: i64, total_pages: u64) -> Vec<PageLink> {
    let total = total_pages as i64;
    if total <= SHOW_PAGES {
        return (1..=total).map(PageLink::Page).collect();
    }

    let mut start = (current - SIDE_PAGES).max(2);
    let mut end = (current + SIDE_PAGES).min(total - 1);

    if current <= SIDE_PAGES + 2 {
        end = SHOW_PAGES - 1;
    }
    if current >= total - SIDE_PAGES - 1 {
        start = total - SHOW_PAGES + 2;
    }

    let mut links = vec![PageLink::Page(1)];
    if start > 2 {
        links.push(PageLink::Ellipsis);
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total - 1 {
        links.push(PageLink::Ellipsis);
    }
    links.push(PageLink::Page(total));
    links
}

/// Whether clicking `page` should navigate: it must exist and differ from the
/// page already shown.
pub fn is_navigable(page: i64, current: i64, total_pages: u64) -> bool {
    page != current && page >= 1 && page <= total_pages as i64
}

/// Targets of the first/previous/next/last buttons; `None` means disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav {
    pub first: Option<i64>,
    pub previous: Option<i64>,
    pub next: Option<i64>,
    pub last: Option<i64>,
}

impl PageNav {
    pub fn new(current: i64, total_pages: u64) -> Self {
        let target = |page: i64| is_navigable(page, current, total_pages).then_some(page);
        Self {
            first: target(1),
            previous: target(current - 1),
            next: target(current + 1),
            last: target(total_pages as i64),
        }
    }
}
