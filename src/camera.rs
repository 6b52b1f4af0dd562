use crate::{
    color::{to_rgb, Image, Rgb},
    error::ConfigError,
    hittable::Hit,
    interval::Interval,
    ray::Ray,
    vec3::{Color, Point3, Vec3},
};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator};
use log::{debug, info};
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};
use rayon::prelude::*;
use std::time::Instant;

pub type Float = f64;

/// Valid distances along a camera ray. The lower bound is exclusive so a ray
/// never reports a hit at its own origin.
pub const T_RANGE: Interval = Interval::new(0.0, Float::INFINITY);

const VIEWPORT_HEIGHT: Float = 2.0;
const FOCAL_LENGTH: Float = 1.0;
const MIN_ASPECT_RATIO: Float = 1e-6;

const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Where each sample ray crosses its pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampler {
    /// Uniform offset in `[-0.5, 0.5]` on each axis. With a seed the image is
    /// reproducible, without one every render draws fresh entropy.
    Jittered { seed: Option<u64> },
    /// Every sample goes through the pixel center
    Center,
}

/// Geometry derived from the camera configuration before any ray is cast
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub image_width: usize,
    pub image_height: usize,
    pub center: Point3,
    /// Center of the top left pixel
    pub pixel00_loc: Point3,
    pub pixel_du: Vec3,
    pub pixel_dv: Vec3,
}

impl Viewport {
    fn new(image_width: usize, aspect_ratio: Float) -> Self {
        let image_height = ((image_width as Float / aspect_ratio) as usize).max(1);
        let center = Point3::ZERO;

        // Use the real pixel ratio rather than aspect_ratio, the height was rounded
        let viewport_width = VIEWPORT_HEIGHT * (image_width as Float / image_height as Float);

        // Displacement vectors from left to right and top to bottom of viewport
        let viewport_u = Vec3::new(viewport_width, 0.0, 0.0);
        let viewport_v = Vec3::new(0.0, -VIEWPORT_HEIGHT, 0.0);

        let pixel_du = viewport_u / image_width as Float;
        let pixel_dv = viewport_v / image_height as Float;

        let vp_upper_left =
            center - Vec3::new(0.0, 0.0, FOCAL_LENGTH) - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = vp_upper_left + (pixel_du + pixel_dv) * 0.5;

        Viewport {
            image_width,
            image_height,
            center,
            pixel00_loc,
            pixel_du,
            pixel_dv,
        }
    }

    /// Ray from the camera center through pixel `(x, y)`, displaced by
    /// `offset` pixels from the pixel center.
    pub fn ray_through(&self, x: usize, y: usize, offset: (Float, Float)) -> Ray {
        let pixel_sample = self.pixel00_loc
            + self.pixel_du * (x as Float + offset.0)
            + self.pixel_dv * (y as Float + offset.1);
        Ray::new(self.center, pixel_sample - self.center)
    }
}

/// Pinhole camera at the origin looking down -z.
///
/// Derived geometry is computed lazily on the first render and thrown away
/// whenever a setter changes the configuration.
#[derive(Clone, Debug)]
pub struct Camera {
    aspect_ratio: Float,
    image_width: usize,
    samples_per_pixel: usize,
    sampler: Sampler,
    viewport: Option<Viewport>,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            sampler: Sampler::Jittered { seed: None },
            viewport: None,
        }
    }
}

impl Camera {
    pub fn new(
        aspect_ratio: Float,
        image_width: usize,
        samples_per_pixel: usize,
        sampler: Sampler,
    ) -> Result<Self, ConfigError> {
        let mut camera = Camera {
            sampler,
            ..Default::default()
        };
        camera.set_aspect_ratio(aspect_ratio)?;
        camera.set_image_width(image_width)?;
        camera.set_samples_per_pixel(samples_per_pixel)?;
        Ok(camera)
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: Float) -> Result<(), ConfigError> {
        if !aspect_ratio.is_finite() || aspect_ratio < MIN_ASPECT_RATIO {
            return Err(ConfigError::InvalidAspectRatio(aspect_ratio));
        }
        self.aspect_ratio = aspect_ratio;
        self.viewport = None;
        Ok(())
    }

    pub fn set_image_width(&mut self, image_width: usize) -> Result<(), ConfigError> {
        if image_width == 0 {
            return Err(ConfigError::NonPositiveWidth);
        }
        self.image_width = image_width;
        self.viewport = None;
        Ok(())
    }

    pub fn set_samples_per_pixel(&mut self, samples_per_pixel: usize) -> Result<(), ConfigError> {
        if samples_per_pixel == 0 {
            return Err(ConfigError::NonPositiveSamples);
        }
        self.samples_per_pixel = samples_per_pixel;
        Ok(())
    }

    pub fn set_sampler(&mut self, sampler: Sampler) {
        self.sampler = sampler;
    }

    pub fn aspect_ratio(&self) -> Float {
        self.aspect_ratio
    }

    pub fn image_width(&self) -> usize {
        self.image_width
    }

    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    pub fn sampler(&self) -> Sampler {
        self.sampler
    }

    /// Derives the viewport if the configuration changed since the last call
    pub fn initialize(&mut self) -> Viewport {
        if let Some(viewport) = self.viewport {
            return viewport;
        }
        let viewport = Viewport::new(self.image_width, self.aspect_ratio);
        debug!(
            "Camera initialized: {}x{} pixels, pixel00 at ({}), du ({}), dv ({})",
            viewport.image_width,
            viewport.image_height,
            viewport.pixel00_loc,
            viewport.pixel_du,
            viewport.pixel_dv
        );
        self.viewport = Some(viewport);
        viewport
    }

    /// Renders rows in parallel. Each row draws from its own generator so a
    /// seeded render is identical no matter how rows get scheduled.
    pub fn render<H: Hit>(&mut self, world: &H) -> Image {
        self.render_with_progress(world, ProgressBar::hidden())
    }

    pub fn render_with_progress<H: Hit>(&mut self, world: &H, progress_bar: ProgressBar) -> Image {
        let viewport = self.initialize();
        let camera: &Camera = self;
        let start = Instant::now();
        info!(
            "Rendering {}x{} at {} sample(s) per pixel",
            viewport.image_width, viewport.image_height, camera.samples_per_pixel
        );

        let pixels: Vec<Rgb> = (0..viewport.image_height)
            .into_par_iter()
            .progress_with(progress_bar)
            .flat_map_iter(|y| camera.render_row(world, &viewport, y))
            .collect();

        info!("Render finished in {:.3}s", start.elapsed().as_secs_f64());
        Image::new(pixels, viewport.image_width, viewport.image_height)
    }

    /// Single threaded reference loop, rows top to bottom
    pub fn render_sequential<H: Hit>(&mut self, world: &H, progress_bar: ProgressBar) -> Image {
        let viewport = self.initialize();
        let start = Instant::now();
        info!(
            "Rendering {}x{} sequentially at {} sample(s) per pixel",
            viewport.image_width, viewport.image_height, self.samples_per_pixel
        );

        let mut pixels = Vec::with_capacity(viewport.image_width * viewport.image_height);
        for y in (0..viewport.image_height).progress_with(progress_bar) {
            pixels.extend(self.render_row(world, &viewport, y));
        }

        info!("Render finished in {:.3}s", start.elapsed().as_secs_f64());
        Image::new(pixels, viewport.image_width, viewport.image_height)
    }

    fn render_row<H: Hit>(&self, world: &H, viewport: &Viewport, y: usize) -> Vec<Rgb> {
        let mut rng = self.row_rng(y);
        (0..viewport.image_width)
            .map(|x| to_rgb(&self.pixel_color(world, viewport, x, y, &mut rng)))
            .collect()
    }

    fn row_rng(&self, y: usize) -> StdRng {
        match self.sampler {
            Sampler::Jittered { seed: Some(seed) } => StdRng::from_seed(row_seed(seed, y)),
            _ => StdRng::from_entropy(),
        }
    }

    /// Mean linear color over `samples_per_pixel` rays through pixel `(x, y)`
    pub fn pixel_color<H: Hit>(
        &self,
        world: &H,
        viewport: &Viewport,
        x: usize,
        y: usize,
        rng: &mut StdRng,
    ) -> Color {
        let jitter = Uniform::new_inclusive(-0.5, 0.5);
        let total: Color = (0..self.samples_per_pixel)
            .map(|_| {
                let offset = match self.sampler {
                    Sampler::Jittered { .. } => (jitter.sample(rng), jitter.sample(rng)),
                    Sampler::Center => (0.0, 0.0),
                };
                ray_color(world, &viewport.ray_through(x, y, offset))
            })
            .sum();
        total * (1.0 / self.samples_per_pixel as Float)
    }
}

/// Generator seed for row `y`. Seed and row occupy separate words, so no two
/// `(seed, row)` pairs share a stream.
pub fn row_seed(seed: u64, y: usize) -> <StdRng as SeedableRng>::Seed {
    let mut bytes = <StdRng as SeedableRng>::Seed::default();
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&(y as u64).to_le_bytes());
    bytes
}

/// Surface normal mapped into `[0, 1]` on a hit, vertical white to blue sky otherwise
pub fn ray_color<H: Hit + ?Sized>(world: &H, ray: &Ray) -> Color {
    if let Some(hit) = world.hit(ray, &T_RANGE) {
        return (hit.normal + Color::ONE) * 0.5;
    }
    background(ray)
}

pub fn background(ray: &Ray) -> Color {
    let unit_dir = ray.direction.normalized();
    let a = (unit_dir.y + 1.0) * 0.5;
    Color::ONE.lerp(&SKY_BLUE, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::{Sphere, World};
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    fn two_sphere_world() -> World {
        let mut world = World::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5));
        world.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0));
        world
    }

    #[test]
    fn test_default_config() {
        let camera = Camera::default();
        assert_eq!(camera.aspect_ratio(), 1.0);
        assert_eq!(camera.image_width(), 100);
        assert_eq!(camera.samples_per_pixel(), 10);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert_eq!(
            Camera::new(1.0, 0, 1, Sampler::Center).unwrap_err(),
            ConfigError::NonPositiveWidth
        );
        assert_eq!(
            Camera::new(1.0, 10, 0, Sampler::Center).unwrap_err(),
            ConfigError::NonPositiveSamples
        );
        assert!(matches!(
            Camera::new(0.0, 10, 1, Sampler::Center),
            Err(ConfigError::InvalidAspectRatio(_))
        ));
        assert!(matches!(
            Camera::new(-2.0, 10, 1, Sampler::Center),
            Err(ConfigError::InvalidAspectRatio(_))
        ));
        assert!(matches!(
            Camera::new(Float::NAN, 10, 1, Sampler::Center),
            Err(ConfigError::InvalidAspectRatio(_))
        ));
    }

    #[test]
    fn test_viewport_geometry() {
        let mut camera = Camera::new(16.0 / 9.0, 400, 1, Sampler::Center).unwrap();
        let viewport = camera.initialize();
        assert_eq!(viewport.image_height, 225);

        let viewport_width = 2.0 * 400.0 / 225.0;
        assert_abs_diff_eq!(viewport.pixel_du.x, viewport_width / 400.0, epsilon = 1e-12);
        assert_abs_diff_eq!(viewport.pixel_dv.y, -2.0 / 225.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            viewport.pixel00_loc.x,
            -viewport_width / 2.0 + viewport.pixel_du.x / 2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(viewport.pixel00_loc.y, 1.0 - 1.0 / 225.0, epsilon = 1e-12);
        assert_abs_diff_eq!(viewport.pixel00_loc.z, -1.0);
    }

    #[test]
    fn test_height_floored_to_one() {
        let mut camera = Camera::new(50.0, 10, 1, Sampler::Center).unwrap();
        assert_eq!(camera.initialize().image_height, 1);
    }

    #[test]
    fn test_setter_invalidates_viewport() {
        let mut camera = Camera::new(2.0, 40, 1, Sampler::Center).unwrap();
        assert_eq!(camera.initialize().image_height, 20);
        camera.set_image_width(80).unwrap();
        assert_eq!(camera.initialize().image_height, 40);
        camera.set_aspect_ratio(1.0).unwrap();
        let image = camera.render(&World::new());
        assert_eq!((image.width(), image.height()), (80, 80));
    }

    #[test]
    fn test_ray_through_applies_offset() {
        let mut camera = Camera::new(1.0, 10, 1, Sampler::Center).unwrap();
        let viewport = camera.initialize();
        let ray = viewport.ray_through(3, 4, (0.25, -0.5));
        let expected =
            viewport.pixel00_loc + viewport.pixel_du * 3.25 + viewport.pixel_dv * 3.5;
        assert_eq!(ray.origin, Vec3::ZERO);
        assert_abs_diff_eq!(ray.direction.x, expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(ray.direction.y, expected.y, epsilon = 1e-12);
        assert_abs_diff_eq!(ray.direction.z, expected.z, epsilon = 1e-12);
    }

    #[test]
    fn test_background_gradient() {
        let up = background(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        assert_abs_diff_eq!(up.x, 0.5);
        assert_abs_diff_eq!(up.y, 0.7);
        assert_abs_diff_eq!(up.z, 1.0);

        let down = background(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_normal_shading() {
        let world = two_sphere_world();
        let color = ray_color(&world, &Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)));
        // Straight on hit, normal is +z
        assert_abs_diff_eq!(color.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(color.y, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(color.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_center_sampling_matches_single_sample() {
        let world = two_sphere_world();
        let mut single = Camera::new(16.0 / 9.0, 64, 1, Sampler::Center).unwrap();
        let mut many = Camera::new(16.0 / 9.0, 64, 9, Sampler::Center).unwrap();
        let viewport = single.initialize();
        assert_eq!(viewport, many.initialize());

        let mut rng = StdRng::seed_from_u64(0);
        for (x, y) in [(0, 0), (32, 18), (63, 35), (10, 30)] {
            let a = single.pixel_color(&world, &viewport, x, y, &mut rng);
            let b = many.pixel_color(&world, &viewport, x, y, &mut rng);
            let center = ray_color(&world, &viewport.ray_through(x, y, (0.0, 0.0)));
            assert_eq!(a, center);
            assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
            assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
            assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_jittered_mean_stays_near_center() {
        // Background only, so the color varies smoothly across the pixel
        let world = World::new();
        let mut camera =
            Camera::new(1.0, 20, 4000, Sampler::Jittered { seed: Some(11) }).unwrap();
        let viewport = camera.initialize();
        let mut rng = StdRng::seed_from_u64(11);

        let mean = camera.pixel_color(&world, &viewport, 5, 5, &mut rng);
        let center = ray_color(&world, &viewport.ray_through(5, 5, (0.0, 0.0)));
        assert_abs_diff_eq!(mean.x, center.x, epsilon = 1e-3);
        assert_abs_diff_eq!(mean.y, center.y, epsilon = 1e-3);
        assert_abs_diff_eq!(mean.z, center.z, epsilon = 1e-3);
    }

    #[test]
    fn test_row_seed_layout() {
        let seed = row_seed(0x0102_0304_0506_0708, 3);
        assert_eq!(&seed[..8], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(&seed[8..16], &[3, 0, 0, 0, 0, 0, 0, 0]);
        assert!(seed[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_neighbouring_seeds_do_not_share_rows() {
        let camera = |seed| {
            Camera::new(1.0, 4, 1, Sampler::Jittered { seed: Some(seed) }).unwrap()
        };
        let a: u64 = camera(5).row_rng(1).gen();
        let b: u64 = camera(6).row_rng(0).gen();
        let c: u64 = camera(5).row_rng(1).gen();
        assert_ne!(a, b);
        assert_eq!(a, c);
        assert_ne!(row_seed(5, 1), row_seed(6, 0));
    }

    #[test]
    fn test_seeded_render_is_reproducible() {
        let world = two_sphere_world();
        let sampler = Sampler::Jittered { seed: Some(42) };
        let mut camera = Camera::new(16.0 / 9.0, 48, 4, sampler).unwrap();

        let first = camera.render(&world);
        let second = camera.render(&world);
        let sequential = camera.render_sequential(&world, ProgressBar::hidden());
        assert_eq!(first, second);
        assert_eq!(first, sequential);
    }
}
