pub mod cli;
pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod keymap;
pub mod model;
pub mod repository;

pub use config::Config;
pub use error::{Error, Result};
