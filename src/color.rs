//! Conversion of linear colour to output bytes, and the image container that
//! renders produce.

use crate::{interval::Interval, vec3::Color};
use itertools::Itertools;
use std::{io::Write, path::Path};

/// Channel values are clamped here before scaling, so 1.0 still lands on 255
const INTENSITY: Interval = Interval::new(0.000, 0.999);

pub type Rgb = [u8; 3];

/// Quantize a single linear channel to `[0, 255]`
pub fn to_byte(channel: f64) -> u8 {
    (256.0 * INTENSITY.clamp(channel)) as u8
}

pub fn to_rgb(color: &Color) -> Rgb {
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Rendered pixels stored row-major, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl Image {
    /// `pixels` must be in scanline order and hold exactly `width * height` entries.
    /// Only renders build images, and they always produce a full grid.
    pub(crate) fn new(pixels: Vec<Rgb>, width: usize, height: usize) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "image of {}x{} needs {} pixels",
            width,
            height,
            width * height
        );
        Image {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, col: usize, row: usize) -> Option<Rgb> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.pixels.get(row * self.width + col).copied()
    }

    /// Write the image as an ASCII PPM (P3), one pixel per line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;
        for [r, g, b] in self.pixels.iter() {
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        out.flush()
    }

    pub fn to_ppm_string(&self) -> String {
        let body = self
            .pixels
            .iter()
            .map(|[r, g, b]| format!("{} {} {}\n", r, g, b))
            .join("");
        format!("P3\n{} {}\n255\n{}", self.width, self.height, body)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        let raw = self.pixels.iter().flatten().copied().collect_vec();
        let buffer = image::RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .ok_or_else(|| {
                image::ImageError::Parameter(image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ))
            })?;
        buffer.save_with_format(path, image::ImageFormat::Png)
    }
}
