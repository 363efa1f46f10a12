//! Digit Feature Extraction CLI
//!
//! Extracts feature vectors from grayscale digit images and writes one
//! line per image to stdout.

use clap::{Parser, ValueEnum};
use digit_features::{
    digit::{FileConfig, OutputFormat},
    DigitImage, ExtractionSnapshot, FeatureExtractor, MetricsRegistry,
};
use ndarray::Array2;
use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "digit-features", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output line format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Print Prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,

    /// Log each binarized image as ASCII art
    #[arg(long)]
    preview: bool,

    /// Images to process (PNG, converted to 8-bit grayscale)
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Digit feature extractor v{}", digit_features::VERSION);

    let file_config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => FileConfig::default(),
    };

    let extractor = match FeatureExtractor::new(&file_config.extractor) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let format = cli.format.map(OutputFormat::from).unwrap_or(file_config.output.format);
    let show_metrics = cli.metrics || file_config.output.metrics;

    info!(
        image_size = extractor.image_size(),
        features = extractor.feature_len(),
        "Extractor ready"
    );

    let registry = if show_metrics {
        match MetricsRegistry::new() {
            Ok(registry) => Some(registry),
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut snapshot = ExtractionSnapshot {
        vector_length: extractor.feature_len(),
        ..Default::default()
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for path in &cli.images {
        let image = match DigitImage::open(path) {
            Ok(image) => image,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                snapshot.rejected += 1;
                continue;
            }
        };

        let binary = match extractor.preprocess(&image) {
            Ok(binary) => binary,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                snapshot.rejected += 1;
                continue;
            }
        };
        if cli.preview {
            info!("{}:\n{}", path.display(), render_ascii(&binary));
        }

        let vector = extractor.parts(binary.view()).concatenate();
        debug!(path = %path.display(), features = vector.len(), "Extracted");

        if let Err(e) = write_line(&mut out, format, path, vector.as_slice()) {
            eprintln!("Failed to write output: {}", e);
            std::process::exit(1);
        }

        snapshot.processed += 1;
        snapshot.foreground_pixels = Some(binary.sum() as u64);
    }

    if let Err(e) = out.flush() {
        eprintln!("Failed to write output: {}", e);
        std::process::exit(1);
    }

    info!(
        "Processed {} images: {} extracted, {} rejected",
        cli.images.len(),
        snapshot.processed,
        snapshot.rejected
    );

    if let Some(registry) = registry {
        registry.update(&snapshot);
        match registry.encode() {
            Ok(text) => eprint!("{}", text),
            Err(e) => warn!("Failed to encode metrics: {}", e),
        }
    }

    if snapshot.rejected > 0 {
        std::process::exit(1);
    }
}

/// One JSON output line.
#[derive(Serialize)]
struct Record<'a> {
    path: String,
    features: &'a [f64],
}

/// Writes one output record.
fn write_line(
    out: &mut impl Write,
    format: OutputFormat,
    path: &Path,
    values: &[f64],
) -> io::Result<()> {
    match format {
        OutputFormat::Csv => {
            write!(out, "{}", csv_field(&path.display().to_string()))?;
            for v in values {
                write!(out, ",{}", v)?;
            }
            writeln!(out)
        }
        OutputFormat::Json => {
            let record = Record {
                path: path.display().to_string(),
                features: values,
            };
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)
        }
    }
}

/// Quotes a CSV field when it contains a separator, quote or line break.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Renders a binary image with `#` for foreground and `.` for background.
fn render_ascii(binary: &Array2<f64>) -> String {
    binary
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v > 0.0 { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
