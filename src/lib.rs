pub mod app;
pub mod config;
pub mod game;
pub mod haptics;
pub mod input;
pub mod layout;
pub mod render;
pub mod snake;
pub mod speed;
pub mod store;
pub mod term;
pub mod timer;
