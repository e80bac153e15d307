pub mod backend;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod http;
pub mod speech;

pub use acavox_common::formatter;
pub use acavox_common::protocol;
