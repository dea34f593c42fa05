// src/lib.rs

pub mod config;
pub mod context;
pub mod db;
pub mod platforms;
pub mod render;
pub mod repositories;
pub mod services;
pub mod sheets;
pub mod tasks;
pub mod utils;

pub use config::Settings;
pub use context::BotContext;
pub use db::Database;
pub use pixelbot_common::error::Error;
