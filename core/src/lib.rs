pub mod classify;
pub mod exec;
pub mod service;
pub mod token;
