#![forbid(unsafe_code)]

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use mpds_phases_audit::{
    audit_release, build_release_manifest, read_release_file, write_audit_report,
    write_release_manifest, AuditOptions, ReleaseFormat,
};
use mpds_phases_core::{ExitCode, MachineError, ENV_PHASES_LOG};
use mpds_phases_model::{parse_phase_url, parse_release_year};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mpds-phases")]
#[command(about = "Distinct-phases release operations CLI")]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a release file and enumerate every schema violation.
    Validate {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatCli::Auto)]
        format: FormatCli,
        #[arg(long)]
        report_out: Option<PathBuf>,
    },
    /// Build and write the publication manifest for a clean release.
    Manifest {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        release: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatCli::Auto)]
        format: FormatCli,
    },
    /// Record count plus the first few records of a release file.
    Inspect {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = 5)]
        sample_rows: usize,
        #[arg(long, value_enum, default_value_t = FormatCli::Auto)]
        format: FormatCli,
    },
    /// Extract the integer phase identifier from a phase URL.
    PhaseId { id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatCli {
    Auto,
    Array,
    Jsonl,
}

impl FormatCli {
    const fn to_release_format(self) -> ReleaseFormat {
        match self {
            Self::Auto => ReleaseFormat::Auto,
            Self::Array => ReleaseFormat::Array,
            Self::Jsonl => ReleaseFormat::JsonLines,
        }
    }
}

struct Failure {
    exit: ExitCode,
    error: MachineError,
}

impl Failure {
    fn internal(message: &str) -> Self {
        Self {
            exit: ExitCode::Internal,
            error: MachineError::new(ExitCode::Internal.as_str(), message),
        }
    }

    fn validation(message: &str) -> Self {
        Self {
            exit: ExitCode::Validation,
            error: MachineError::new(ExitCode::Validation.as_str(), message),
        }
    }

    fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.error = self.error.with_detail(key, value);
        self
    }
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    match run(&cli) {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(failure) => {
            if cli.json {
                match serde_json::to_string(&failure.error) {
                    Ok(payload) => eprintln!("{payload}"),
                    Err(_) => eprintln!("{}", failure.error),
                }
            } else {
                eprintln!("{}", failure.error);
            }
            ProcessExitCode::from(failure.exit as u8)
        }
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_env(ENV_PHASES_LOG).unwrap_or_else(|_| EnvFilter::new("info")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<(), Failure> {
    match &cli.command {
        Commands::Validate {
            path,
            format,
            report_out,
        } => validate_release(cli, path, *format, report_out.as_deref()),
        Commands::Manifest {
            path,
            release,
            out,
            format,
        } => manifest_release(cli, path, release, out, *format),
        Commands::Inspect {
            path,
            sample_rows,
            format,
        } => inspect_release(cli, path, *sample_rows, *format),
        Commands::PhaseId { id } => phase_id(cli, id),
    }
}

fn validate_release(
    cli: &Cli,
    path: &PathBuf,
    format: FormatCli,
    report_out: Option<&std::path::Path>,
) -> Result<(), Failure> {
    let outcome = audit_release(&AuditOptions {
        input_path: path.clone(),
        format: format.to_release_format(),
    })
    .map_err(|e| Failure::internal(&e.0))?;
    let report = &outcome.validated.report;
    info!(
        records = report.record_count,
        violations = report.violations.len(),
        duplicate_keys = report.duplicate_keys.len(),
        "release audited"
    );

    if let Some(out) = report_out {
        write_audit_report(out, report).map_err(|e| Failure::internal(&e.0))?;
    }

    if cli.json {
        let payload = json!({
            "record_count": report.record_count,
            "clean": report.is_clean(),
            "severity_summary": report.severity_summary(),
            "violations": report.violations,
            "duplicate_keys": report.duplicate_keys,
        });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| Failure::internal(&e.to_string()))?
        );
    } else if report.is_clean() {
        if !cli.quiet {
            println!("release validation: OK records={}", report.record_count);
        }
    } else {
        for violation in &report.violations {
            println!("{violation}");
        }
        for group in &report.duplicate_keys {
            println!(
                "duplicate phase key {} at records {:?} (phase_ids {:?})",
                group.key, group.indexes, group.phase_ids
            );
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(Failure::validation("release failed validation")
            .with_detail("violations", &report.violations.len().to_string())
            .with_detail("duplicate_keys", &report.duplicate_keys.len().to_string()))
    }
}

fn manifest_release(
    cli: &Cli,
    path: &PathBuf,
    release: &str,
    out: &PathBuf,
    format: FormatCli,
) -> Result<(), Failure> {
    let release = parse_release_year(release).map_err(|e| Failure::validation(&e.0))?;
    let outcome = audit_release(&AuditOptions {
        input_path: path.clone(),
        format: format.to_release_format(),
    })
    .map_err(|e| Failure::internal(&e.0))?;
    if !outcome.validated.is_clean() {
        return Err(Failure::validation(
            "refusing to write a manifest for a release with violations",
        ));
    }

    let source_bytes = fs::read(path)
        .map_err(|e| Failure::internal(&format!("failed to read {}: {e}", path.display())))?;
    let source_filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let manifest = build_release_manifest(
        &release,
        &source_bytes,
        source_filename,
        &outcome.validated.records,
    )
    .map_err(|e| Failure::internal(&e.0))?;
    write_release_manifest(out, &manifest).map_err(|e| Failure::internal(&e.0))?;
    info!(release = %manifest.release, out = %out.display(), "manifest written");

    if cli.json {
        let payload = json!({
            "manifest": out.display().to_string(),
            "record_count": manifest.stats.record_count,
            "records_signature_sha256": manifest.records_signature_sha256,
        });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| Failure::internal(&e.to_string()))?
        );
    } else if !cli.quiet {
        println!("release manifest: {}", out.display());
    }
    Ok(())
}

fn inspect_release(
    cli: &Cli,
    path: &PathBuf,
    sample_rows: usize,
    format: FormatCli,
) -> Result<(), Failure> {
    let raw = read_release_file(path, format.to_release_format())
        .map_err(|e| Failure::internal(&e.0))?;
    let sample: Vec<&serde_json::Value> = raw.iter().take(sample_rows).collect();

    if cli.json {
        let payload = json!({
            "record_count": raw.len(),
            "sample": sample,
        });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| Failure::internal(&e.to_string()))?
        );
    } else {
        println!("record_count={}", raw.len());
        for record in sample {
            println!("{record}");
        }
    }
    Ok(())
}

fn phase_id(cli: &Cli, id: &str) -> Result<(), Failure> {
    let url = parse_phase_url(id).map_err(|e| Failure::validation(&e.to_string()))?;
    let extracted = url
        .phase_id()
        .ok_or_else(|| Failure::validation("id must end in a positive integer phase_id segment"))?;
    if cli.json {
        println!("{}", json!({ "phase_id": extracted }));
    } else {
        println!("{extracted}");
    }
    Ok(())
}
