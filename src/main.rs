//! Headless entry point: inspect a recording's frames and labels, or
//! convert labels between formats.
//!
//! Usage:
//!   cloudlabel info [folder]               summarize frames and labels
//!   cloudlabel convert <from> <to>         re-encode labels (centroid/kitti)

use std::path::Path;

use cloudlabel::cloud::FrameSet;
use cloudlabel::config::AppConfig;
use cloudlabel::format::LabelManager;

fn main() {
    let config = AppConfig::load_from_default_path().unwrap_or_else(AppConfig::new);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(match config.log_level.to_level_filter() {
            log::LevelFilter::Error => "error",
            log::LevelFilter::Warn => "warn",
            log::LevelFilter::Info => "info",
            log::LevelFilter::Debug => "debug",
            _ => "trace",
        }),
    )
    .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("convert") if args.len() == 3 => convert(&config, &args[1], &args[2]),
        Some("info") => info(&config, args.get(1).map(String::as_str)),
        None => info(&config, None),
        _ => {
            eprintln!("usage: cloudlabel info [folder] | cloudlabel convert <from> <to>");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Print per-frame element counts for the configured (or given) folder.
fn info(config: &AppConfig, folder: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let folder = folder.unwrap_or(&config.files.pointcloud_folder);
    let mut frames = FrameSet::from_folder(Path::new(folder))?;
    let labels = LabelManager::new(
        config.labeling.mode,
        &config.labeling.label_format,
        Path::new(&config.files.label_folder),
        config.labeling.export_precision,
    );

    println!("{} frames in {}", frames.len(), folder);
    loop {
        let Some(stem) = frames.frame_stem(&config.files.frame_postfix) else {
            break;
        };
        let elements = labels.import_labels(&stem);
        println!("  {}: {} elements", stem, elements.len());
        if !frames.advance() {
            break;
        }
    }
    Ok(())
}

/// Re-encode every frame's labels from one codec to another.
fn convert(config: &AppConfig, from: &str, to: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut frames = FrameSet::from_folder(Path::new(&config.files.pointcloud_folder))?;
    let label_folder = Path::new(&config.files.label_folder);
    let precision = config.labeling.export_precision;
    let source = LabelManager::new(config.labeling.mode, from, label_folder, precision);
    let target = LabelManager::new(config.labeling.mode, to, label_folder, precision);

    let mut converted = 0usize;
    loop {
        let Some(stem) = frames.frame_stem(&config.files.frame_postfix) else {
            break;
        };
        let elements = source.import_labels(&stem);
        if !elements.is_empty() {
            target.export_labels(&stem, &elements)?;
            converted += 1;
        }
        if !frames.advance() {
            break;
        }
    }

    log::info!(
        "Converted labels of {} frames from {} to {}.",
        converted,
        source.format_id(),
        target.format_id()
    );
    Ok(())
}
