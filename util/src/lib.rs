pub mod config;
pub mod paths;
pub mod system_health;
pub mod test_helpers;
