pub mod app;
pub mod capture;
pub mod cli;
pub mod config;
pub mod devices;
pub mod global;
pub mod pipeline;
pub mod playback;
pub mod screenshot;
pub mod ui;
