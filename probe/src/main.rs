use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use umbra_detect::Detector;
use umbra_detect::aggregate::DEFAULT_EXCLUDE_THRESHOLD;
use umbra_detect::snapshot::{PageSnapshot, SnapshotPage};

mod report;

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid snapshot {path}: {source}")]
    Snapshot { path: PathBuf, source: serde_json::Error },
    #[error("threshold {0} is outside [0, 1]")]
    Threshold(f64),
    #[error("cannot encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "umbra-probe", about = "Native dark theme detection against page snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every detector against a JSON page snapshot.
    Detect(DetectCommand),
    /// Print the relative luminance of CSS colors.
    Luminance(LuminanceCommand),
}

#[derive(Args, Debug)]
struct DetectCommand {
    snapshot: PathBuf,

    #[arg(long, default_value_t = DEFAULT_EXCLUDE_THRESHOLD)]
    threshold: f64,

    /// Extra hostname treated as having a native dark theme. Repeatable.
    #[arg(long = "known-site")]
    known_sites: Vec<String>,

    /// Print the detection result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct LuminanceCommand {
    #[arg(required = true)]
    colors: Vec<String>,
}

fn main() -> Result<(), ProbeError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Detect(detect) => run_detect(detect),
        Command::Luminance(luminance) => {
            println!("{}", report::render_luminance(&luminance.colors));
            Ok(())
        }
    }
}

fn run_detect(detect: DetectCommand) -> Result<(), ProbeError> {
    if !(0.0..=1.0).contains(&detect.threshold) {
        return Err(ProbeError::Threshold(detect.threshold));
    }
    let raw = fs::read_to_string(&detect.snapshot)
        .map_err(|source| ProbeError::Io { path: detect.snapshot.clone(), source })?;
    let snapshot =
        PageSnapshot::from_json(&raw).map_err(|source| ProbeError::Snapshot { path: detect.snapshot.clone(), source })?;
    let page = SnapshotPage::new(snapshot);
    let detector = Detector { exclude_threshold: detect.threshold, extra_known_sites: detect.known_sites };

    if detect.json {
        println!("{}", serde_json::to_string_pretty(&detector.run(&page))?);
    } else {
        println!("{}", report::render_detection(&detector, &page));
    }
    Ok(())
}
