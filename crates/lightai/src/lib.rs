pub mod cli;
mod log;
pub mod server;
