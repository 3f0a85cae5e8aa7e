pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod looks;
pub mod scanner;
pub mod tagging;
