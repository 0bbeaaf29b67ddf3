//! Catalog outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `CatalogSource`
//! port.

mod dto;
mod http_source;

pub use http_source::CatalogHttpSource;
