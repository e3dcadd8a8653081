//! # maize-core
//!
//! Core types shared across all MaizeCare crates:
//! - Entity structs for the persisted records (users, plants, diseases, soil readings, notifications)
//! - Enums with their SQL string forms
//! - ID prefix constants
//! - The JSON response envelope used by every route

pub mod entities;
pub mod enums;
pub mod ids;
pub mod responses;
