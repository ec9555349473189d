pub mod config;
pub mod handlers;
pub mod stats;
pub mod user_page;
pub mod utils;

#[cfg(test)]
pub mod fixtures;
