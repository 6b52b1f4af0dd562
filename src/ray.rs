use crate::{
    camera::Float,
    vec3::{Point3, Vec3},
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    /// Not required to be unit length, but must not be zero
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: Float) -> Point3 {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    pub point: Point3,
    /// Unit length, always facing back against the incoming ray
    pub normal: Vec3,
    pub t: Float,
    pub is_front_face: bool,
}

impl HitRecord {
    /// Builds a record from the surface's outward normal, flipping it when the
    /// ray arrives from the inside.
    pub fn with_outward_normal(ray: &Ray, point: Point3, t: Float, outward_normal: Vec3) -> Self {
        let is_front_face = Self::is_front_face(ray, &outward_normal);
        let normal = if is_front_face {
            outward_normal
        } else {
            -outward_normal
        };
        HitRecord {
            point,
            normal,
            t,
            is_front_face,
        }
    }

    pub fn is_front_face(ray: &Ray, outward_normal: &Vec3) -> bool {
        ray.direction.dot(outward_normal) < 0.0
    }
}
