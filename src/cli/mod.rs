//! CLI module
//!
//! A small presentation layer over the fetch controller.
//!
//! # Commands
//!
//! - `list` - Load pages of search results and print them
//! - `rate-limit` - Show the rate limit reported by the search endpoint

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{Runner, TOKEN_ENV};
