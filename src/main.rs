use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tfinventory::config::{Config, PRIVATE_IP_ENV};
use tfinventory::state::StateSource;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Ansible dynamic inventory from Terraform state
#[derive(Parser, Debug)]
#[command(name = "tfinventory", version, about, long_about = None)]
struct Args {
    /// Print the whole inventory (default)
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "NAME")]
    host: Option<String>,

    /// Local state snapshot, read instead of running `terraform state pull`
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Use private addresses even when a public IP exists
    #[arg(long)]
    private_ip: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Logs never go to stdout, which carries the inventory
fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!("tfinventory started with log level: {:?}", level);

    Ok(Some(guard))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let config = Config::load();
    let env_private_ip = std::env::var(PRIVATE_IP_ENV).ok();
    let use_private_ip = config.effective_use_private_ip(args.private_ip, env_private_ip.as_deref());

    let loader = config.state_loader(args.state_file.clone())?;
    let state = loader.load().context("Failed to load Terraform state")?;

    let inventory = tfinventory::generate(&state, use_private_ip)?;

    let output = match &args.host {
        Some(name) => match inventory.host_vars(name) {
            Some(vars) => serde_json::to_string_pretty(vars)?,
            None => {
                tracing::warn!("Host {} not found in inventory", name);
                "{}".to_string()
            }
        },
        None => {
            tracing::debug!("Listing inventory (--list: {})", args.list);
            serde_json::to_string_pretty(&inventory)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output)?;
    stdout.flush()?;

    Ok(())
}
