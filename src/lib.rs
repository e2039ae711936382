pub mod backend;
pub mod config;
pub mod math;
pub mod state;
pub mod visualizer;
