pub mod parser;
pub mod registry;
pub mod types;
