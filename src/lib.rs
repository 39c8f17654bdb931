pub mod assets;
pub mod config;
pub mod gui;
pub mod headless;
pub mod model;
pub mod run_loop;
