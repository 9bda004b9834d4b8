use clap::{Parser, Subcommand};
use rust_haar::{CascadeDef, CascadeModel, Detector, DetectorOptions, GrayImage};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "haartool", version, about = "RustHaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run cascade detection on a single image
    Detect {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        cascade: PathBuf,
        #[arg(long)]
        parallel: bool,
    },
    /// Print scan counters for an image without reporting rectangles
    Stats {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        cascade: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Detect {
            image,
            cascade,
            parallel,
        } => run_detect(&image, &cascade, parallel),
        Command::Stats { image, cascade } => run_stats(&image, &cascade),
    }
}

fn load_detector(path: &PathBuf, options: DetectorOptions) -> Result<Detector, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read cascade {}: {e}", path.display()))?;
    let def: CascadeDef =
        serde_json::from_str(&json).map_err(|e| format!("failed to parse cascade: {e}"))?;
    let model = CascadeModel::build(&def).map_err(|e| format!("invalid cascade: {e}"))?;
    Ok(Detector::with_options(model, options))
}

fn load_gray(path: &PathBuf) -> Result<GrayImage, String> {
    let img = image::open(path).map_err(|e| format!("failed to load {}: {e}", path.display()))?;
    let luma = img.to_luma8();
    let (width, height) = (luma.width() as usize, luma.height() as usize);
    GrayImage::from_raw(width, height, luma.into_raw()).map_err(|e| e.to_string())
}

fn run_detect(image_path: &PathBuf, cascade_path: &PathBuf, parallel: bool) -> ExitCode {
    let options = DetectorOptions {
        parallel,
        ..DetectorOptions::default()
    };
    let result = load_detector(cascade_path, options).and_then(|detector| {
        let gray = load_gray(image_path)?;
        let start = Instant::now();
        let detections = detector.detect(&gray).map_err(|e| e.to_string())?;
        Ok((gray, detections, start.elapsed()))
    });

    match result {
        Ok((gray, detections, elapsed)) => {
            println!(
                "{}x{}: {} detections in {:.1}ms",
                gray.width(),
                gray.height(),
                detections.len(),
                elapsed.as_secs_f64() * 1000.0
            );
            for r in &detections {
                println!("{} {} {} {}", r.x, r.y, r.width, r.height);
            }
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run_stats(image_path: &PathBuf, cascade_path: &PathBuf) -> ExitCode {
    let result = load_detector(cascade_path, DetectorOptions::default()).and_then(|detector| {
        let gray = load_gray(image_path)?;
        detector
            .detect_with_telemetry(&gray)
            .map_err(|e| e.to_string())
    });

    match result {
        Ok((_, telemetry)) => {
            println!("scales:            {}", telemetry.scales);
            println!("windows:           {}", telemetry.windows);
            println!("stage evaluations: {}", telemetry.stages_evaluated);
            println!("raw detections:    {}", telemetry.raw_detections);
            println!("merged detections: {}", telemetry.merged_detections);
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}
