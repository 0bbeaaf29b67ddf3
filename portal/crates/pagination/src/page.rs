//! Validated one-based page numbers.

use std::fmt;
use std::num::NonZeroU32;

use thiserror::Error;

/// Errors returned when constructing a [`PageNumber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageNumberError {
    /// Pages are one-based; zero is never a valid page.
    #[error("page numbers start at 1")]
    Zero,
}

/// One-based page index.
///
/// # Examples
/// ```
/// use pagination::PageNumber;
///
/// let page = PageNumber::new(3).expect("non-zero");
/// assert_eq!(page.next_within(3), None);
/// assert_eq!(page.previous().map(PageNumber::get), Some(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Validate a raw page index.
    ///
    /// # Errors
    ///
    /// Returns [`PageNumberError::Zero`] when `value` is zero.
    pub fn new(value: u32) -> Result<Self, PageNumberError> {
        NonZeroU32::new(value).map(Self).ok_or(PageNumberError::Zero)
    }

    /// Raw page index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Page before this one, or `None` on the first page.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        NonZeroU32::new(self.get() - 1).map(Self)
    }

    /// Page after this one when it does not exceed `total_pages`.
    #[must_use]
    pub fn next_within(self, total_pages: u32) -> Option<Self> {
        self.0
            .checked_add(1)
            .filter(|next| next.get() <= total_pages)
            .map(Self)
    }

    /// Clamp this page into `1..=total_pages`; an empty listing clamps to 1.
    #[must_use]
    pub fn clamp_to(self, total_pages: u32) -> Self {
        NonZeroU32::new(self.get().min(total_pages))
            .map_or(Self::FIRST, Self)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
