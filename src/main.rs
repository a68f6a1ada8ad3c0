use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use video_gallery::{cli::Args, GalleryError, GalleryPipeline};

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<GalleryError>() {
            Some(gallery_err) => {
                error!("{}", gallery_err.user_message());
                ExitCode::from(gallery_err.exit_code())
            }
            None => {
                error!("{:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(args: &Args) -> Result<()> {
    info!("Starting video-gallery v{}", env!("CARGO_PKG_VERSION"));

    let config = args.resolve()?;
    info!(
        "Size: {} ({}x{}), {}s per image, {}s crossfade, {} fps",
        config.size.label(),
        config.frame_size().width,
        config.frame_size().height,
        config.duration,
        config.crossfade,
        config.fps
    );

    let pipeline = GalleryPipeline::new(config);

    if args.dry_run {
        let plan = pipeline.plan()?;
        pipeline.describe(&plan);
        return Ok(());
    }

    let video = pipeline.run()?;
    info!(
        "{} frames, {:.2}s, {} bytes{}",
        video.frame_count,
        video.duration,
        video.file_size,
        if video.has_audio { "" } else { " (silent)" }
    );
    Ok(())
}
