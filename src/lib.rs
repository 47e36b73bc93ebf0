pub mod analytics;
pub mod config;
pub mod export;
pub mod fetch;
pub mod fuel;
pub mod infra;
pub mod message;
pub mod pipeline;
pub mod services;
pub mod store;
