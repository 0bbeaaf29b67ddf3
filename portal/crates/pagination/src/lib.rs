//! Pagination primitives shared by catalog listings.
//!
//! The crate owns three small concerns:
//!
//! - [`PageNumber`]: a validated one-based page index.
//! - [`PageInfo`]: the `info` envelope returned by paginated list endpoints.
//! - [`compute_range`]: the ellipsis-compressed sequence of page markers a
//!   pager renders.
//!
//! # Example
//!
//! ```
//! use pagination::{PageMarker, compute_range};
//!
//! let range = compute_range(5, 10, 2);
//! assert_eq!(range.first(), Some(&PageMarker::Number(1)));
//! assert_eq!(range.last(), Some(&PageMarker::Number(10)));
//! ```

mod envelope;
mod page;
mod range;

pub use envelope::PageInfo;
pub use page::{PageNumber, PageNumberError};
pub use range::{DEFAULT_WINDOW_RADIUS, PageMarker, compute_range};
