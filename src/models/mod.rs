//! Wire types for the Trading Assistant API.

pub mod auth;
pub mod portfolio;
pub mod registry;
