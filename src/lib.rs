pub mod black_hole;
pub mod camera;
pub mod config;
pub mod error;
pub mod image;
pub mod manager;
pub mod math;
pub mod presets;
pub mod ray;
pub mod renderer;
pub mod rgb;

pub use math::*;
pub use ray::Ray;
pub use rgb::RGB;
