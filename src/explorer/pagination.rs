// src/explorer/pagination.rs

use std::ops::Range;

pub const PAGE_SIZE: usize = 25;

/// Exposes a growing prefix of the ranked matches. Never reorders.
#[derive(Debug, Clone)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// New matcher output: back to page 1.
    pub fn reset(&mut self, total: usize) {
        self.page = 1;
        self.total = total;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn visible_len(&self) -> usize {
        self.page.saturating_mul(self.page_size).min(self.total)
    }

    pub fn has_more(&self) -> bool {
        self.visible_len() < self.total
    }

    pub fn visible<'a, T>(&self, sequence: &'a [T]) -> &'a [T] {
        &sequence[..self.visible_len().min(sequence.len())]
    }

    /// Handle a "near end of content" signal. Grows by one page when more
    /// items exist and nothing is still resolving; returns the newly visible
    /// index range.
    pub fn advance(&mut self, resolving: bool) -> Option<Range<usize>> {
        if resolving || !self.has_more() {
            return None;
        }

        let start = self.visible_len();
        self.page += 1;
        Some(start..self.visible_len())
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}
