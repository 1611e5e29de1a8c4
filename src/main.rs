use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use biome_version::config::{DetectorConfig, log_path};
use biome_version::{Channel, ManifestKind, VersionDetector};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "biome-version")]
#[command(version, about = "Detect the Biome version a project depends on")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the npm registry
    #[arg(long, global = true, env = "BIOME_VERSION_REGISTRY")]
    registry: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to a file (defaults to the data directory) instead of stderr
    #[arg(long, global = true, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the version from the manifests of one or more project directories
    Detect {
        #[arg(default_value = ".")]
        dirs: Vec<PathBuf>,
    },
    /// Detect the version from a single manifest file
    Lockfile {
        #[arg(value_enum)]
        kind: ManifestKind,
        path: PathBuf,
        /// Treat an unreadable file as "not detected" instead of an error
        #[arg(long)]
        lenient: bool,
    },
    /// Print the latest published version
    Latest {
        #[arg(long, value_enum, default_value = "stable")]
        channel: Channel,
    },
    /// Print all published versions, highest first
    Versions {
        /// Include prerelease versions
        #[arg(long)]
        prereleases: bool,
    },
}

/// Initialize the tracing subscriber.
///
/// `--verbose` forces debug level, otherwise `RUST_LOG` applies with a
/// default of warn. The returned guard flushes the log file on drop.
fn init_tracing(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = if verbose {
        EnvFilter::new("biome_version=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .init();
        return Ok(None);
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .context("Log file path has no file name")?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter)
        .init();

    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> anyhow::Result<DetectorConfig> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };

    if let Some(registry) = &cli.registry {
        config.registry_url = registry.clone();
    }

    Ok(config)
}

/// Print a detected version, or explain on stderr why there is none
fn report(label: Option<&str>, version: Option<String>, what: &str) -> bool {
    match (label, version) {
        (Some(label), Some(version)) => println!("{}: {}", label, version),
        (None, Some(version)) => println!("{}", version),
        (Some(label), None) => eprintln!("{}: {} not detected", label, what),
        (None, None) => {
            eprintln!("{} not detected", what);
            return false;
        }
    }
    true
}

async fn run(cli: Cli, config: DetectorConfig) -> anyhow::Result<ExitCode> {
    let detector = VersionDetector::from_config(&config);
    let package = detector.package_name().to_string();

    let success = match cli.command {
        Command::Detect { dirs } => {
            // Each project is independent, so detect them concurrently
            let results = futures::future::join_all(
                dirs.iter()
                    .map(|dir| detector.detect_from_dependencies(dir)),
            )
            .await;

            let labelled = dirs.len() > 1;
            dirs.iter().zip(results).fold(true, |ok, (dir, version)| {
                let found = version.is_some();
                let label = dir.display().to_string();
                report(labelled.then_some(label.as_str()), version, &package);
                ok && found
            })
        }
        Command::Lockfile {
            kind,
            path,
            lenient,
        } => {
            let detection = detector.detect(kind, &path, !lenient).await?;
            report(None, detection.into_version(), &package)
        }
        Command::Latest { channel } => {
            let version = detector.get_latest_version(channel).await;
            report(None, version, &format!("latest {}", package))
        }
        Command::Versions { prereleases } => match detector.get_all_versions(prereleases).await {
            Some(versions) => {
                for version in versions {
                    println!("{}", version);
                }
                true
            }
            None => {
                eprintln!("Unable to fetch versions of {}", package);
                false
            }
        },
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .map(|path| path.unwrap_or_else(log_path));
    let _guard = init_tracing(cli.verbose, log_file.as_deref())?;

    let config = load_config(&cli)?;
    tracing::debug!("Using registry {}", config.registry_url);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}
