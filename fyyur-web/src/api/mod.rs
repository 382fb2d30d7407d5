//! HTTP handlers for fyyur-web

pub mod artists;
pub mod health;
pub mod pages;
pub mod shows;
pub mod venues;

pub use health::health_routes;
