use crate::{
    camera::Float,
    interval::Interval,
    ray::{HitRecord, Ray},
    vec3::Point3,
};
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub trait Hit: Send + Sync {
    /// Nearest intersection whose `t` lies strictly inside `range`
    fn hit(&self, ray: &Ray, range: &Interval) -> Option<HitRecord>;
}

/// Every surface the renderer knows how to intersect
#[enum_dispatch(Hit)]
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere,
}

/// The scene. Owns its shapes outright for as long as it lives.
#[derive(Clone, Debug, Default)]
pub struct World {
    shapes: Vec<Shape>,
}

impl World {
    pub fn new() -> Self {
        World { shapes: Vec::new() }
    }

    pub fn build(shapes: Vec<Shape>) -> Self {
        World { shapes }
    }

    pub fn add(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

impl Hit for World {
    /// Returns nearest hit to camera for the given ray within the given view range
    fn hit(&self, ray: &Ray, range: &Interval) -> Option<HitRecord> {
        // Shrinking the range after every hit means anything farther away can't be reported
        let mut nearest_range = *range;
        let mut nearest_hit = None;

        for shape in self.shapes.iter() {
            if let Some(hit) = shape.hit(ray, &nearest_range) {
                nearest_range = nearest_range.with_max(hit.t);
                nearest_hit = Some(hit);
            }
        }

        nearest_hit
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Point3,
    pub radius: Float,
}

impl Sphere {
    pub fn new(center: Point3, radius: Float) -> Self {
        let radius = radius.max(0.0);
        Sphere { center, radius }
    }
}

impl Hit for Sphere {
    fn hit(&self, ray: &Ray, range: &Interval) -> Option<HitRecord> {
        if self.radius <= 0.0 {
            return None; // a point has no surface normal
        }

        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(&oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None; // no point hit on the sphere
        }

        let sqrt_disc = discriminant.sqrt();
        // Find either root (hit point) in range
        let mut t = (h - sqrt_disc) / a; // min root
        if !range.surrounds(t) {
            t = (h + sqrt_disc) / a; // max root if min is out of range
            if !range.surrounds(t) {
                return None; // both out of range
            }
        }

        let point_on_sphere = ray.at(t);
        let outward_normal = (point_on_sphere - self.center) / self.radius;
        Some(HitRecord::with_outward_normal(ray, point_on_sphere, t, outward_normal))
    }
}
