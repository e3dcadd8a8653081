//! Entity structs for all MaizeCare records.
//!
//! Each entity maps to a table in the libSQL database (see
//! `maize-db/migrations/001_initial.sql`). Wire names are camelCase to match
//! the mobile client.

mod disease;
mod notification;
mod plant;
mod soil;
mod user;

pub use disease::Disease;
pub use notification::Notification;
pub use plant::Plant;
pub use soil::SoilReading;
pub use user::{NewUser, User};
