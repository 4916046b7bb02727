pub mod migrations;
mod migrator;
pub mod runner;

pub use migrator::Migrator;
pub use runner::ensure_schema;
