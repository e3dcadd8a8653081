//! # maize-auth
//!
//! Request identity for MaizeCare.
//!
//! The [`IdentityResolver`] turns an `Authorization: Bearer` credential (or,
//! outside production, a raw development header) into a [`UserIdentity`]. On
//! the first successful verification for an unseen subject id it provisions a
//! local user record through the injected [`UserDirectory`].
//!
//! The identity provider is also injected ([`IdentityProvider`]); production
//! wiring uses [`ClerkProvider`], tests substitute their own doubles.

pub mod claims;
pub mod clerk;
pub mod directory;
pub mod error;
pub mod identity;
pub mod provider;
pub mod resolver;

pub use claims::IdentityClaims;
pub use clerk::ClerkProvider;
pub use directory::UserDirectory;
pub use error::{DirectoryError, ProviderError, ResolveError};
pub use identity::{IdentitySource, UserIdentity};
pub use provider::{IdentityProvider, NewAccount, UnconfiguredProvider};
pub use resolver::{IdentityResolver, Provisioned, ResolverSettings, bearer_credential};
