//! Core translation engine module

pub mod client;
pub mod config;
pub mod errors;
pub mod handler;
pub mod models;
pub mod phrases;
pub mod prompt;
pub mod provider;
