mod cli;

use clap::Parser;
use cli::Args;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use spheretrace::{
    camera::{Camera, Sampler},
    scenes,
};
use std::{
    error::Error,
    fs::File,
    io::{self, BufWriter},
};

fn init_logger(args: &Args) {
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();
}

fn progress_bar(rows: usize) -> ProgressBar {
    let bar = ProgressBar::new(rows as u64);
    let template = "{elapsed_precise} [{bar:40}] {pos}/{len} scanlines";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(&args);

    let sampler = if args.no_jitter {
        Sampler::Center
    } else {
        Sampler::Jittered { seed: args.seed }
    };
    let world = scenes::two_spheres();
    let mut camera = Camera::new(args.aspect_ratio, args.width, args.samples, sampler)?;

    let viewport = camera.initialize();
    let bar = progress_bar(viewport.image_height);
    let image = if args.sequential {
        camera.render_sequential(&world, bar.clone())
    } else {
        camera.render_with_progress(&world, bar.clone())
    };
    bar.finish_and_clear();

    let is_png = args
        .output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if args.output.as_os_str() == "-" {
        image.write_ppm(&mut BufWriter::new(io::stdout().lock()))?;
    } else if is_png {
        image.save_png(&args.output)?;
    } else {
        image.write_ppm(&mut BufWriter::new(File::create(&args.output)?))?;
    }
    info!("Wrote {}x{} image to {}", image.width(), image.height(), args.output.display());

    Ok(())
}
