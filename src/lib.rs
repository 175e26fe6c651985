pub mod bot;
pub mod cache;
pub mod cli;
pub mod error;
pub mod schedule;
pub mod server;
pub mod sheets;
pub mod slack;
pub mod store;

pub use error::{Error, Result};
