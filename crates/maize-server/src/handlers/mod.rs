//! Route handlers, one module per resource.
//!
//! Every handler except `health`, `auth::register` and `auth::login` takes a
//! [`CurrentUser`](crate::extract::CurrentUser) and scopes its queries to it.

pub mod auth;
pub mod dashboard;
pub mod diseases;
pub mod health;
pub mod notifications;
pub mod plants;
pub mod soil;
pub mod users;
