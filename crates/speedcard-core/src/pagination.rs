use serde::{Deserialize, Serialize};

use crate::PageError;
use crate::entry::Entry;

/// One entry per page.
pub const DEFAULT_PAGE_SIZE: usize = 1;

/// What to do with a page request outside `[1, total]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePolicy {
    /// Refuse the change and keep the current page.
    #[default]
    Reject,
    /// Move to the nearest valid page.
    Clamp,
}

impl PagePolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Clamp => "clamp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

/// Validate a 1-based page request against `total` pages.
pub fn clamp_page(requested: i64, total: usize, policy: PagePolicy) -> Result<usize, PageError> {
    if total == 0 {
        return Err(PageError::Empty);
    }
    let last = i64::try_from(total).unwrap_or(i64::MAX);
    if (1..=last).contains(&requested) {
        return Ok(requested as usize);
    }
    match policy {
        PagePolicy::Reject => Err(PageError::OutOfRange { requested, total }),
        PagePolicy::Clamp => Ok(requested.clamp(1, last) as usize),
    }
}

/// Entries shown on 1-based `page`. Empty for pages past the end.
pub fn slice_for_page(entries: &[Entry], page: usize, page_size: usize) -> &[Entry] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= entries.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(entries.len());
    &entries[start..end]
}

/// Current page over a roster of `total` pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current: usize,
    total: usize,
    policy: PagePolicy,
}

impl Pager {
    pub fn new(total: usize, policy: PagePolicy) -> Self {
        Self {
            current: 1,
            total,
            policy,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn policy(&self) -> PagePolicy {
        self.policy
    }

    /// Move to `requested`. On error the current page is unchanged.
    pub fn go_to(&mut self, requested: i64) -> Result<usize, PageError> {
        let page = clamp_page(requested, self.total, self.policy)?;
        self.current = page;
        Ok(page)
    }

    /// Step forward; stays on the last page.
    pub fn next(&mut self) -> usize {
        if self.current < self.total {
            self.current += 1;
        }
        self.current
    }

    /// Step back; stays on page 1.
    pub fn prev(&mut self) -> usize {
        if self.current > 1 {
            self.current -= 1;
        }
        self.current
    }

    pub fn first(&mut self) -> usize {
        self.current = 1;
        self.current
    }

    pub fn last(&mut self) -> usize {
        self.current = self.total.max(1);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Up to `width` consecutive page numbers containing the current page,
    /// centred on it where the ends allow.
    pub fn window(&self, width: usize) -> std::ops::RangeInclusive<usize> {
        if self.total == 0 || width == 0 {
            return 1..=0;
        }
        let width = width.min(self.total);
        let half = width / 2;
        let start = self
            .current
            .saturating_sub(half)
            .max(1)
            .min(self.total + 1 - width);
        start..=start + width - 1
    }
}
