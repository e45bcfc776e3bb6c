//! Page-group windowing shared by the catalog controller and the pager view.
//!
//! `current_page` and `current_group` step independently on next/previous:
//! the group moves whenever another group exists, the page moves whenever
//! another page exists. Nothing forces
//! `current_group == (current_page - 1) / pages_per_group` afterwards.

use shared::domain::PaginationDescriptor;

pub const PAGES_PER_GROUP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    current_page: u32,
    current_group: u32,
    pages_per_group: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::at(1, 0)
    }
}

impl PageWindow {
    pub fn at(current_page: u32, current_group: u32) -> Self {
        Self {
            current_page: current_page.max(1),
            current_group,
            pages_per_group: PAGES_PER_GROUP,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn current_group(&self) -> u32 {
        self.current_group
    }

    pub fn pages_per_group(&self) -> u32 {
        self.pages_per_group
    }

    pub fn total_groups(&self, total_pages: u32) -> u32 {
        total_pages.div_ceil(self.pages_per_group)
    }

    pub fn advance(&mut self, total_pages: u32) {
        if self.current_group + 1 < self.total_groups(total_pages) {
            self.current_group += 1;
        }
        if self.current_page < total_pages {
            self.current_page += 1;
        }
    }

    pub fn retreat(&mut self) {
        if self.current_group > 0 {
            self.current_group -= 1;
        }
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Jump to one of the visible numbers. The group is left alone.
    /// Returns whether the page changed; pages outside the visible run are refused.
    pub fn select(&mut self, page: u32, total_pages: u32) -> bool {
        if page == self.current_page
            || !self.visible_page_numbers(total_pages).any(|visible| visible == page)
        {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn visible_page_numbers(&self, total_pages: u32) -> VisiblePages {
        VisiblePages {
            next: self.current_group * self.pages_per_group + 1,
            remaining: self.pages_per_group,
            total_pages,
        }
    }

    pub fn view(&self, descriptor: &PaginationDescriptor) -> PagerView {
        PagerView {
            visible: descriptor.total_pages > 1,
            prev_enabled: descriptor.has_pre,
            next_enabled: descriptor.has_next,
            pages: self
                .visible_page_numbers(descriptor.total_pages)
                .map(|number| PageLink {
                    number,
                    active: number == self.current_page,
                })
                .collect(),
        }
    }
}

/// Lazy page-number run for the current group. Build a fresh one per render.
#[derive(Debug, Clone)]
pub struct VisiblePages {
    next: u32,
    remaining: u32,
    total_pages: u32,
}

impl Iterator for VisiblePages {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 || self.next > self.total_pages {
            return None;
        }
        let page = self.next;
        self.next += 1;
        self.remaining -= 1;
        Some(page)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub active: bool,
}

/// What the pager renders. Prev/next follow the store's flags, not local math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerView {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub pages: Vec<PageLink>,
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
