//! Catalog resource identifiers and kinds.

use std::fmt;

use thiserror::Error;

/// The three kinds of catalog resource with a detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A character.
    Character,
    /// An episode.
    Episode,
    /// A location.
    Location,
}

impl ResourceKind {
    /// Path segment the catalog API uses for this kind.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Episode => "episode",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Validation errors returned when constructing a [`ResourceId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("resource id must not be empty")]
    Empty,
    /// Identifier would not survive being placed in a URL path segment.
    #[error("resource id must be a single path segment without commas: {value}")]
    InvalidSegment {
        /// The rejected value.
        value: String,
    },
}

/// Opaque catalog identifier, safe to embed in a request path.
///
/// # Examples
/// ```
/// use portal::domain::catalog::ResourceId;
///
/// let id = ResourceId::from_reference_url("https://rickandmortyapi.com/api/episode/28")
///     .expect("url ends in an id");
/// assert_eq!(id.as_str(), "28");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Validate a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceIdValidationError`] for blank values or values that
    /// contain `/`, `,`, `?`, `#`, or whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ResourceIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ResourceIdValidationError::Empty);
        }
        if raw
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | ',' | '?' | '#'))
        {
            return Err(ResourceIdValidationError::InvalidSegment { value: raw });
        }
        Ok(Self(raw))
    }

    /// Take the final path segment of a reference URL.
    ///
    /// Trailing slashes are ignored. Returns `None` when the URL has no
    /// usable final segment (for example an empty reference).
    #[must_use]
    pub fn from_reference_url(url: &str) -> Option<Self> {
        url.trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| Self::new(segment).ok())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
