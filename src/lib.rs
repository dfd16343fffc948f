pub mod args;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod gen;
pub mod group;
pub mod rename;
pub mod utils;

pub type BResult<T> = Result<T, Box<dyn std::error::Error>>;
