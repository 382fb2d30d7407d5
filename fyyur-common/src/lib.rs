//! # Fyyur Common Library
//!
//! Shared code for the Fyyur booking directory:
//! - Database schema, row models and queries (venues, artists, shows)
//! - Configuration loading and root folder resolution
//! - Show timing (past/upcoming) and display formatting
//! - Fixed form choices (US states, genres)

pub mod choices;
pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
