pub mod app;
pub mod controls;
pub mod display;
pub mod error;
pub mod recorder;
pub mod sampler;
pub mod session;
pub mod test_helpers;
pub mod ticker;
