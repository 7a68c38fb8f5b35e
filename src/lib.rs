// src/lib.rs
pub mod config;
pub mod errors;
pub mod providers;
pub mod analyzer;
pub mod extract;
pub mod models;
pub mod upload;
pub mod session;
pub mod client;
pub mod render;
pub mod banner;
pub mod api;
