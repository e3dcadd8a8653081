//! # maize-server
//!
//! The MaizeCare HTTP API.
//!
//! [`build_router`] assembles every route under the configured API prefix.
//! Protected routes pass through [`middleware::require_identity`], which
//! runs the [`maize_auth::IdentityResolver`] and attaches the resulting
//! [`maize_auth::UserIdentity`] to the request; handlers read it back with
//! the [`extract::CurrentUser`] extractor and use its internal id as the
//! ownership filter for every query.
//!
//! All JSON responses, including errors, use the
//! [`maize_core::responses::Envelope`] shape.

pub mod classifier;
pub mod cli;
pub mod directory;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod uploads;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
