//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_source;
mod identity_provider;
mod token_cache;

#[cfg(test)]
pub use catalog_source::MockCatalogSource;
pub use catalog_source::{CatalogSource, CharacterQuery, FetchError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    AuthStateListener, AuthSubscription, IdentityProvider, IdentityProviderError,
    ProviderAccount,
};
#[cfg(test)]
pub use token_cache::MockTokenCache;
pub use token_cache::{CachedTokens, TokenCache};
