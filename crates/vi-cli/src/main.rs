//! vi-report - vehicle inspection report CLI
//!
//! - `render`: compose an inspection report and write HTML or the section list as JSON
//! - `classify`: severity band of a tread depth reading
//! - `check-measurement`: validate a tire reading before it is stored

mod error;
mod exit_codes;
mod logging;
mod settings;

use clap::{Args, Parser, Subcommand, ValueEnum};
use error::{CliError, Result};
use exit_codes::ExitCode;
use logging::{init_logging, LogConfig, LogFormat, LogLevel};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use vi_annotate::{classify, upsert_tire_measurement, SeverityBand, TirePosition};
use vi_report::{
    DiagramKind, FsImageSource, HtmlRenderer, InspectionRecord, ReportComposer, ReportConfig,
    StoredSnapshots,
};

/// Vehicle inspection report generator
#[derive(Parser)]
#[command(name = "vi-report")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose an inspection report
    Render(RenderArgs),

    /// Print the severity band of a tread depth reading (mm, or "none")
    Classify {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Validate a tire reading for a wheel position (fl, fr, rl, rr)
    CheckMeasurement {
        position: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Inspection record (JSON)
    #[arg(long)]
    inspection: PathBuf,

    /// Company settings (TOML, or JSON with a .json extension)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Report configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Captured body diagram image
    #[arg(long)]
    body_snapshot: Option<PathBuf>,

    /// Captured tire diagram image
    #[arg(long)]
    tire_snapshot: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = RenderFormat::Html)]
    format: RenderFormat,

    /// Output file (stdout when omitted)
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RenderFormat {
    Html,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(
        &LogConfig::from_env(cli_level, cli.global.log_format)
            .with_timestamps(cli.global.verbose > 1),
    );

    let result = match cli.command {
        Commands::Render(args) => run_render(&args).await,
        Commands::Classify { value } => run_classify(&value),
        Commands::CheckMeasurement { position, value } => run_check_measurement(&position, &value),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            eprintln!("vi-report: {}", err);
            err.exit_code()
        }
    };
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Commands
// ============================================================================

async fn run_render(args: &RenderArgs) -> Result<()> {
    let record = read_record(&args.inspection)?;
    let settings = settings::load_settings(args.settings.as_deref())?;
    let config = match &args.config {
        Some(path) => ReportConfig::from_json(&read_text(path)?)?,
        None => ReportConfig::default(),
    };

    let mut snapshots = StoredSnapshots::new();
    for (kind, path) in [
        (DiagramKind::Body, &args.body_snapshot),
        (DiagramKind::Tires, &args.tire_snapshot),
    ] {
        if let Some(path) = path {
            snapshots = snapshots.with_snapshot(kind, read_bytes(path)?);
        }
    }

    let source = FsImageSource::new(config.images.max_source_bytes);
    let composer = ReportComposer::new(config, source, snapshots);
    let report = composer.compose(record.as_ref(), &settings).await?;

    let payload = match args.format {
        RenderFormat::Html => HtmlRenderer::new().render(&report),
        RenderFormat::Json => report.to_json()?,
    };
    match &args.out {
        Some(path) => std::fs::write(path, payload.as_bytes()).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(payload.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| CliError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }

    eprintln!(
        "{}: {} sections, {} warnings",
        report.file_name,
        report.sections.len(),
        report.warnings.len()
    );
    Ok(())
}

fn run_classify(value: &str) -> Result<()> {
    let reading = parse_reading(value)?;
    print_json(&band_json(reading, classify(reading)))
}

fn run_check_measurement(position: &str, value: &str) -> Result<()> {
    let position: TirePosition = position.parse().map_err(CliError::Args)?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| CliError::Args(format!("not a number: {}", value)))?;
    let measurements = upsert_tire_measurement(&[], position, value)?;
    let measurement = measurements[0];
    debug!(position = %measurement.position, value = measurement.value, "measurement accepted");

    let mut json = band_json(Some(measurement.value), classify(Some(measurement.value)));
    json["position"] = serde_json::Value::from(measurement.position.key());
    json["title"] = serde_json::Value::from(measurement.title());
    print_json(&json)
}

// ============================================================================
// Helpers
// ============================================================================

/// `none`/`null`/empty mean "no reading".
fn parse_reading(value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    let blank = ["none", "null"].iter().any(|w| value.eq_ignore_ascii_case(w));
    if value.is_empty() || blank {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| CliError::Args(format!("not a number: {}", value)))
}

fn band_json(value: Option<f64>, band: SeverityBand) -> serde_json::Value {
    serde_json::json!({
        "value": value,
        "band": band,
        "label": band.label(),
        "color": band.color(),
    })
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(vi_report::ReportError::from)?
    );
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the record; a JSON `null` is an absent record, reported by the composer.
///
/// Relative image paths are taken relative to the record file.
fn read_record(path: &Path) -> Result<Option<InspectionRecord>> {
    let text = read_text(path)?;
    let mut record: Option<InspectionRecord> =
        serde_json::from_str(&text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if let (Some(record), Some(base)) = (record.as_mut(), path.parent()) {
        record.vehicle_photo = record
            .vehicle_photo
            .take()
            .map(|r| settings::rebase_reference(&r, base));
        for photo in &mut record.photos {
            photo.image = settings::rebase_reference(&photo.image, base);
        }
    }
    Ok(record)
}
