pub mod camera;
pub mod color;
pub mod error;
pub mod hittable;
pub mod interval;
pub mod ray;
pub mod scenes;
pub mod vec3;
