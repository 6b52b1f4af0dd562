use crate::camera::Float;
use std::fmt;

/// Rejected camera configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    NonPositiveWidth,
    NonPositiveSamples,
    InvalidAspectRatio(Float),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveWidth => write!(f, "image width must be at least 1 pixel"),
            ConfigError::NonPositiveSamples => {
                write!(f, "samples per pixel must be at least 1")
            }
            ConfigError::InvalidAspectRatio(ratio) => write!(
                f,
                "aspect ratio {} is invalid, expected a finite value greater than zero",
                ratio
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
