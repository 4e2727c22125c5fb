// gps/mod.rs
pub mod coords;
pub mod ingest;
pub mod parser;
pub mod types;

pub use ingest::NmeaIngest;
pub use parser::*;
pub use types::*;
