//! Partial-update payloads.
//!
//! Every field is optional; `None` leaves the column unchanged. The structs
//! deserialize from the mobile client's camelCase JSON so handlers can pass
//! request bodies straight through.

pub mod plant;
pub mod soil;
pub mod user;

pub use plant::PlantUpdate;
pub use soil::SoilReadingUpdate;
pub use user::UserUpdate;
