pub mod config;
pub mod errors;
pub mod index;
pub mod linter;
pub mod loader;
pub mod positions;
pub mod report;
pub mod resolver;
pub mod types;
