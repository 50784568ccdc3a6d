pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod http;
pub mod monitor;
pub mod notifier;
pub mod shutdown;
pub mod utils;

#[cfg(test)]
mod testing;
