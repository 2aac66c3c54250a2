// src/views/mod.rs

pub mod admin;
pub mod auth;
pub mod lectures;
pub mod playground;
pub mod quiz;
pub mod results;
