// src/lib.rs

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod identity;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod views;

// Re-export specific items for convenience
pub use api::ApiClient;
pub use controller::TestSessionController;
pub use routes::{Route, resolve};
