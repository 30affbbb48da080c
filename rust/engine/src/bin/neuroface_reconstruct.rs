// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Reconstruct a head from a landmark file and run the reveal
//! headlessly at a simulated frame rate.
//!
//! Usage:
//!   neuroface-reconstruct <landmarks.json|--synthetic> [options]

use anyhow::{bail, Context};
use neuroface_core::{generate_test_landmarks, FaceMetrics, Landmark, REFERENCE_LANDMARK_COUNT};
use neuroface_engine::{
    EncodedImage, EngineConfig, GroupSummary, HeadlessSurface, SceneController, Session, StaticAnalyzer,
    StaticDetector,
};
use neuroface_geometry::SpatialIndexKind;
use serde::Deserialize;
use std::env;
use std::fs;
use std::time::{Duration, Instant};

/// Accepts a bare landmark array or a detector result object
#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkFile {
    List(Vec<Landmark>),
    Analysis { landmarks: Vec<Landmark> },
}

struct Options {
    input: Option<String>,
    output: Option<String>,
    fps: u32,
    width: u32,
    height: u32,
    grid: bool,
}

fn print_usage() {
    println!("Usage: neuroface-reconstruct <landmarks.json|--synthetic> [options]");
    println!();
    println!("Options:");
    println!("  --output <file>   Write the group summary JSON to a file (default: stdout)");
    println!("  --fps <n>         Simulated frame rate (default: 60)");
    println!("  --width <px>      Viewport width (default: 1280)");
    println!("  --height <px>     Viewport height (default: 720)");
    println!("  --grid            Use the grid spatial index for landmark lookups");
    println!();
    println!("Environment: RUST_LOG, NEUROFACE_* configuration variables");
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options {
        input: None,
        output: None,
        fps: 60,
        width: 1280,
        height: 720,
        grid: false,
    };

    match args[1].as_str() {
        "--synthetic" => {}
        path => options.input = Some(path.to_string()),
    }

    let mut i = 2;
    while i < args.len() {
        let value = |i: usize| args.get(i + 1).with_context(|| format!("{} needs a value", args[i]));
        match args[i].as_str() {
            "--output" => {
                options.output = Some(value(i)?.clone());
                i += 1;
            }
            "--fps" => {
                options.fps = value(i)?.parse().context("Invalid fps value")?;
                i += 1;
            }
            "--width" => {
                options.width = value(i)?.parse().context("Invalid width value")?;
                i += 1;
            }
            "--height" => {
                options.height = value(i)?.parse().context("Invalid height value")?;
                i += 1;
            }
            "--grid" => options.grid = true,
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }

    if options.fps == 0 {
        bail!("fps must be positive");
    }
    Ok(options)
}

fn load_landmarks(path: Option<&str>) -> anyhow::Result<Vec<Landmark>> {
    let Some(path) = path else {
        return Ok(generate_test_landmarks(REFERENCE_LANDMARK_COUNT));
    };
    let content = fs::read_to_string(path).with_context(|| format!("Cannot read '{}'", path))?;
    let file: LandmarkFile =
        serde_json::from_str(&content).with_context(|| format!("Cannot parse landmarks in '{}'", path))?;
    Ok(match file {
        LandmarkFile::List(landmarks) | LandmarkFile::Analysis { landmarks } => landmarks,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,neuroface_engine=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }
    let options = parse_args(&args)?;

    let mut config = EngineConfig::from_env();
    if options.grid {
        config.head.deform.spatial_index = SpatialIndexKind::Grid;
    }

    let landmarks = load_landmarks(options.input.as_deref())?;
    tracing::info!(
        landmarks = landmarks.len(),
        source = options.input.as_deref().unwrap_or("synthetic"),
        spatial_index = ?config.head.deform.spatial_index,
        "Starting NeuroFace reconstruction"
    );

    let scene = SceneController::new(HeadlessSurface::default(), options.width, options.height, config)?;
    let metrics = FaceMetrics {
        description: "Metrics not analyzed offline.".to_string(),
        ..FaceMetrics::fallback()
    };
    let mut session = Session::new(
        StaticDetector::new(landmarks),
        StaticAnalyzer::new(metrics),
        scene,
        &config,
    );
    session.enter();

    // The detector is fed directly; the image payload is never inspected
    let started = session
        .process_image(&EncodedImage::from_bytes(Vec::new()))
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    tracing::info!(description = %started.description, "Scan accepted");

    let interval = Duration::from_secs_f64(1.0 / options.fps as f64);
    let max_frames = (config.reveal_duration.as_secs_f64() * options.fps as f64).ceil() as u64 + 2;
    let clock = Instant::now();
    let mut last_logged = 0u8;
    let mut frames = 0u64;
    while frames <= max_frames {
        let report = session.frame(clock + interval * frames as u32);
        frames += 1;
        if let Some(progress) = report.progress {
            if progress >= last_logged.saturating_add(10) || report.completed {
                tracing::info!(progress, frame = frames, "Constructing");
                last_logged = progress;
            }
        }
        if report.completed {
            break;
        }
    }

    let group = session
        .scene()
        .group()
        .context("Scene has no head group after reconstruction")?;
    let json = GroupSummary::from_group(group).to_json()?;
    match &options.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Cannot write '{}'", path))?;
            tracing::info!(path = %path, frames, "Summary written");
        }
        None => println!("{}", json),
    }

    Ok(())
}
