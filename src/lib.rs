pub mod commands;
pub mod config;
pub mod notion;
pub mod schema;
