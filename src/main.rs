use std::path::PathBuf;

use clap::Parser;
use dicom_nifti_volume::{BatchConfig, PatientBatchOrchestrator};
use tracing::{Level, error, info};

#[derive(Parser, Debug)]
#[command(version = env!("CARGO_PKG_VERSION"), about = "Assemble per-patient DICOM series into NIfTI volumes", long_about = None)]
struct Args {
    #[arg(help = "Source root with one directory per subject")]
    source: PathBuf,

    #[arg(help = "Destination root mirroring the source tree")]
    destination: PathBuf,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .finish(),
    ) {
        eprintln!("[ERROR] Could not set up global logging subscriber: {e}");
    }

    let config = BatchConfig::new(args.source, args.destination);
    let report = PatientBatchOrchestrator::new(config)
        .run()
        .unwrap_or_else(|e| {
            error!("{}", e);
            std::process::exit(-1);
        });

    info!(
        "Done: {} subjects, {} volumes, {} segmentations, {} skipped slices, {} failures",
        report.subjects,
        report.volumes.len(),
        report.segmentations.len(),
        report.skipped_slices.len(),
        report.failures.len()
    );
}
