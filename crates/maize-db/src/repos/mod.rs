//! Repository modules implementing CRUD operations for all MaizeCare records.
//!
//! Each module adds methods to `MaizeService` via `impl MaizeService` blocks.

pub mod dashboard;
pub mod disease;
pub mod notification;
pub mod plant;
pub mod soil;
pub mod user;

pub use disease::NewDisease;
pub use notification::{NewNotification, ReadFilter};
pub use soil::NewSoilReading;
