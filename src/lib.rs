// lib.rs - Library exports for the cursor trail overlay
pub mod app;
pub mod cli;
pub mod core;
pub mod math;
pub mod overlay;
