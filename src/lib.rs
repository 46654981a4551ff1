pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod location;
pub mod middleware;

#[cfg(test)]
pub mod testing;
