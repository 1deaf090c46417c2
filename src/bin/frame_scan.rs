use clap::{Parser, Subcommand, ValueEnum};
use frame_scan::tools::{frame_from_rgb, image_iter, load_rgb};
use frame_scan::sink::Discard;
use frame_scan::{
    ConversionPath, DiagnosticReport, FrameAnalyzer, FrameOutcome, MultiFormatDecoder, QrDecoder,
    Rotation, ScanConfig, Symbol, SymbolDecoder, detection_label,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "frame-scan",
    version,
    about = "Run still images through the camera scan pipeline"
)]
struct Cli {
    /// Comma separated rotations to try, e.g. "90,180" (default: SCAN_ROTATIONS or 90,180)
    #[arg(long, global = true, value_delimiter = ',')]
    rotations: Option<Vec<Rotation>>,
    /// Round-trip frames through JPEG at this quality instead of converting directly
    #[arg(long, global = true)]
    jpeg_quality: Option<u8>,
    /// Decoder backend
    #[arg(long, global = true, value_enum, default_value_t = Backend::Multi)]
    decoder: Backend,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Every symbology rxing reads, 1D included
    Multi,
    /// QR only, via rqrr
    Qr,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a single image
    Scan {
        #[arg(long)]
        image: PathBuf,
    },
    /// Scan every image under a directory and print the hit rate
    Dataset {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("frame_scan=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ScanConfig::from_env();
    if let Some(rotations) = cli.rotations {
        config = config.with_rotations(rotations);
    }
    if let Some(quality) = cli.jpeg_quality {
        config = config.with_conversion(ConversionPath::JpegRoundTrip { quality });
    }

    match (cli.command, cli.decoder) {
        (Command::Scan { image }, Backend::Multi) => scan_cmd(&image, &config, MultiFormatDecoder),
        (Command::Scan { image }, Backend::Qr) => scan_cmd(&image, &config, QrDecoder),
        (Command::Dataset { root, limit }, Backend::Multi) => {
            dataset_cmd(&root, limit, &config, MultiFormatDecoder)
        }
        (Command::Dataset { root, limit }, Backend::Qr) => {
            dataset_cmd(&root, limit, &config, QrDecoder)
        }
    }
}

fn scan_cmd<D: SymbolDecoder>(image: &Path, config: &ScanConfig, decoder: D) -> ExitCode {
    let rgb = match load_rgb(image) {
        Ok(rgb) => rgb,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };
    println!("Image: {} ({}x{})", image.display(), rgb.width(), rgb.height());

    let analyzer = FrameAnalyzer::new(
        config,
        decoder,
        |report: &DiagnosticReport| println!("{report}"),
        |symbol: &Symbol| println!("{}", detection_label(symbol)),
    );

    let start = Instant::now();
    let outcome = analyzer.analyze(frame_from_rgb(&rgb));
    let elapsed = start.elapsed();

    match &outcome {
        FrameOutcome::Skipped => println!("Frame skipped"),
        FrameOutcome::Rejected(err) => println!("Frame rejected: {err}"),
        FrameOutcome::Missed(report) => {
            println!("no symbol ({} attempts)", report.attempts.len());
            for attempt in &report.attempts {
                println!("  {}: {:?}", attempt.rotation, attempt.outcome);
            }
        }
        FrameOutcome::Detected(report) => {
            if let Some(rotation) = report.winning_rotation() {
                println!("Decoded at {rotation}");
            }
        }
    }
    println!("Elapsed: {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    ExitCode::SUCCESS
}

fn dataset_cmd<D: SymbolDecoder>(
    root: &Path,
    limit: Option<usize>,
    config: &ScanConfig,
    decoder: D,
) -> ExitCode {
    let analyzer = FrameAnalyzer::new(config, decoder, Discard, Discard);

    let mut total = 0usize;
    let mut hits = 0usize;
    let start = Instant::now();

    for path in image_iter(root, limit) {
        let rgb = match load_rgb(&path) {
            Ok(rgb) => rgb,
            Err(err) => {
                eprintln!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };
        total += 1;
        let outcome = analyzer.analyze(frame_from_rgb(&rgb));
        match outcome.symbol() {
            Some(symbol) => {
                hits += 1;
                println!("HIT  {} -> {} ({})", path.display(), symbol.text, symbol.format);
            }
            None => println!("MISS {}", path.display()),
        }
    }

    if total == 0 {
        eprintln!("No images found under {}", root.display());
        return ExitCode::FAILURE;
    }

    println!(
        "Decoded {}/{} images ({:.1}%) in {:.2} s",
        hits,
        total,
        hits as f64 * 100.0 / total as f64,
        start.elapsed().as_secs_f64()
    );
    ExitCode::SUCCESS
}
