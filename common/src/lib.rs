pub mod config;
pub mod error;
pub mod findings;
pub mod target;
pub mod whitelist;
