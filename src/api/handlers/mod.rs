// src/api/handlers/mod.rs
mod health;
mod analyze;
mod assets;

pub use health::health_check;
pub use analyze::{analyze, analyze_json_config};
pub use assets::{static_file_handler, StaticAssets};
