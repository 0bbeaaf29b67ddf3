//! Ellipsis page range calculation.
//!
//! A range always opens with page 1 and, once there is more than one page,
//! closes with the last page. Between them sits a window of `radius` pages
//! either side of the current page; any gap between the window and the first
//! or last page collapses into a single [`PageMarker::Ellipsis`].

use std::fmt;

/// Window radius used when callers have no preference.
pub const DEFAULT_WINDOW_RADIUS: u32 = 2;

/// One entry in a rendered pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageMarker {
    /// A selectable page number.
    Number(u32),
    /// A collapsed run of page numbers.
    Ellipsis,
}

impl PageMarker {
    /// Return the page number carried by this marker, if any.
    #[must_use]
    pub const fn page(self) -> Option<u32> {
        match self {
            Self::Number(page) => Some(page),
            Self::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(page) => write!(f, "{page}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Compute the page markers for `current` out of `total` pages.
///
/// `total == 0` yields an empty range (no results) and `total == 1` yields a
/// lone first page. `current` is clamped into `1..=total`, so the function is
/// total over every input.
///
/// # Examples
///
/// ```
/// use pagination::{PageMarker::{Ellipsis, Number}, compute_range};
///
/// assert_eq!(
///     compute_range(5, 10, 2),
///     vec![
///         Number(1), Ellipsis, Number(3), Number(4), Number(5),
///         Number(6), Number(7), Ellipsis, Number(10),
///     ],
/// );
/// assert_eq!(compute_range(1, 1, 2), vec![Number(1)]);
/// assert!(compute_range(1, 0, 2).is_empty());
/// ```
#[must_use]
pub fn compute_range(current: u32, total: u32, radius: u32) -> Vec<PageMarker> {
    match total {
        0 => return Vec::new(),
        1 => return vec![PageMarker::Number(1)],
        _ => {}
    }

    let current_page = current.clamp(1, total);
    let left = current_page.saturating_sub(radius).max(2);
    let right = current_page.saturating_add(radius).min(total - 1);

    let mut markers = Vec::with_capacity(radius_capacity(radius));
    markers.push(PageMarker::Number(1));
    if left > 2 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.extend((left..=right).map(PageMarker::Number));
    if right < total - 1 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Number(total));
    markers
}

fn radius_capacity(radius: u32) -> usize {
    // window plus the fixed first/last pages and up to two ellipses
    usize::try_from(radius)
        .unwrap_or(usize::MAX)
        .saturating_mul(2)
        .saturating_add(5)
}
