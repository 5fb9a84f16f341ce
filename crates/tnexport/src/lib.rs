#![forbid(unsafe_code)]

pub mod calculator;
pub mod cli;
pub mod config;
pub mod mapper;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod schema;
pub mod sink;
pub mod sources;
pub mod utils;

pub use cli::app::{Cli, Command};
