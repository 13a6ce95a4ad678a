//! # IO Module
//!
//! Interface layer that exposes the backend to the user. The terminal front end
//! parses commands, validates form input and renders the expense list.

pub mod cli;

pub use cli::{execute, Cli, Command};
