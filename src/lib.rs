pub mod body;
pub mod camera;
pub mod error;
pub mod file;
pub mod gui;
pub mod math;
pub mod scene;
pub mod trajectory;
