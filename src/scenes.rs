use crate::{
    camera::{Camera, Float, Sampler},
    error::ConfigError,
    hittable::{Sphere, World},
    vec3::Vec3,
};

pub const ASPECT_RATIO: Float = 16.0 / 9.0;
pub const IMAGE_WIDTH: usize = 400;

/// Small sphere in front of the camera resting on a huge "ground" sphere
pub fn two_spheres() -> World {
    let mut world = World::new();
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5));
    world.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0));
    world
}

pub fn two_spheres_cam(samples_per_pixel: usize, sampler: Sampler) -> Result<Camera, ConfigError> {
    Camera::new(ASPECT_RATIO, IMAGE_WIDTH, samples_per_pixel, sampler)
}
