pub mod backend;
pub mod cli;
pub mod client;
pub mod core;
