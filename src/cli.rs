use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "spheretrace")]
#[command(about = "Renders a normal-shaded sphere scene to PPM")]
pub struct Args {
    /// Image width in pixels
    #[arg(short, long, default_value_t = 400)]
    pub width: usize,

    /// Width over height, either as a ratio like 16:9 or a plain number
    #[arg(short, long, default_value = "16:9", value_parser = parse_aspect_ratio)]
    pub aspect_ratio: f64,

    /// Rays averaged per pixel
    #[arg(short, long, default_value_t = 10)]
    pub samples: usize,

    /// Seed for the pixel jitter, renders are reproducible when set
    #[arg(long)]
    pub seed: Option<u64>,

    /// Shoot every sample through the pixel center instead of jittering
    #[arg(long)]
    pub no_jitter: bool,

    /// Render on the calling thread only
    #[arg(long)]
    pub sequential: bool,

    /// Output path, `-` for stdout. A .png extension writes PNG, anything else PPM
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

pub fn parse_aspect_ratio(s: &str) -> Result<f64, String> {
    let ratio = match s.split_once(':') {
        Some((w, h)) => {
            let w: f64 = w.trim().parse().map_err(|e| format!("bad width `{}`: {}", w, e))?;
            let h: f64 = h.trim().parse().map_err(|e| format!("bad height `{}`: {}", h, e))?;
            w / h
        }
        None => s
            .trim()
            .parse()
            .map_err(|e| format!("bad aspect ratio `{}`: {}", s, e))?,
    };
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(format!("aspect ratio `{}` must be a positive number", s));
    }
    Ok(ratio)
}
