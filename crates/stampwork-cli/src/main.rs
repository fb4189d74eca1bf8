//! Command-line front end for blueprint parameter resolution.
//!
//! Decodes an exchange string (or plain JSON export), runs two
//! resolution passes over it, and writes the results next to the input:
//! a debug pass with an empty mapping, so placeholder tokens survive
//! for in-game inspection, and a release pass with the real mapping.
//! Release statistics go to stdout as JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stampwork_codec as codec;
use stampwork_resolve::{ParameterMapping, resolve_export};

#[derive(Parser, Debug)]
#[command(name = "stampwork")]
#[command(about = "Resolve blueprint parameters in exchange strings")]
struct Cli {
    /// File holding an exchange string or a JSON export
    input: PathBuf,

    /// JSON file mapping number tokens to overrides
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Directory for output files (defaults to the input's directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Pretty-print emitted JSON
    #[arg(long)]
    pretty: bool,

    /// Also write the release result as an exchange string
    #[arg(long)]
    emit_encoded: bool,

    /// Also write the decoded input as JSON
    #[arg(long)]
    save_decoded: bool,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("mapping file {} is not a valid override map: {source}", path.display())]
    Mapping {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Codec(#[from] codec::CodecError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let text = fs::read_to_string(&cli.input).map_err(|source| AppError::Read {
        path: cli.input.clone(),
        source,
    })?;
    let root = codec::decode(&text)?;

    let out_dir = match &cli.out_dir {
        Some(dir) => dir.clone(),
        None => cli
            .input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    if cli.save_decoded {
        if cli.input.extension().is_some_and(|ext| ext == "json") {
            warn!(input = %cli.input.display(), "input is already JSON, skipping decoded copy");
        } else {
            write_json(&out_dir.join("decoded-blueprint.json"), &root, cli.pretty)?;
        }
    }

    let mapping = match &cli.mapping {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| AppError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| AppError::Mapping {
                path: path.clone(),
                source,
            })?
        }
        None => ParameterMapping::new(),
    };

    // Debug pass: same walk, no replacements, so the output still carries
    // the placeholder tokens.
    let debug_run = resolve_export(&root, &ParameterMapping::new());
    write_json(
        &out_dir.join("debug-blueprint.json"),
        &debug_run.result,
        cli.pretty,
    )?;
    info!(
        blueprints = debug_run.stats.blueprints,
        parameters = debug_run.stats.parameters,
        "debug pass complete"
    );

    let release = resolve_export(&root, &mapping);
    write_json(
        &out_dir.join("release-blueprint.json"),
        &release.result,
        cli.pretty,
    )?;
    if cli.emit_encoded {
        let encoded = codec::encode(&release.result)?;
        let path = out_dir.join("release-blueprint.txt");
        fs::write(&path, encoded).map_err(|source| AppError::Write { path, source })?;
    }
    info!(
        updates = release.stats.parameter_update_instances.total(),
        "release pass complete"
    );

    let stats = if cli.pretty {
        serde_json::to_string_pretty(&release.stats)?
    } else {
        serde_json::to_string(&release.stats)?
    };
    println!("{stats}");
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), AppError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    fs::write(path, json).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stampwork=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
