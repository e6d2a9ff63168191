use crate::{
    backend::http::HttpBackend,
    config::Config,
    console::Console,
    driver::{Driver, RunContext},
    profile::{ProfileSelection, STANDARD_PROFILES},
    region::RegionTable,
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "spp-loadtest")]
#[command(about = "Test the SPP API with randomized coordinate matrices")]
pub struct Args {
    /// Country to draw coordinates in (finland, germany, or a configured region).
    #[arg(value_name = "COUNTRY")]
    pub country: String,

    /// Speed profile in km/h (40, 60, 80, 100, 120); ALL runs every profile.
    #[arg(value_name = "SPEED", value_parser = ProfileSelection::from_str)]
    pub profile: ProfileSelection,

    /// Host to send requests to.
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub host: Option<String>,

    /// Port to use.
    #[arg(short = 'o', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// URL scheme (http or https).
    #[arg(long)]
    pub scheme: Option<String>,

    /// Number of requests made to the API per profile.
    #[arg(short = 'r', long, value_name = "N")]
    pub requests: Option<u32>,

    /// Create an MxM matrix.
    #[arg(short, long, value_name = "M")]
    pub dim: Option<usize>,

    /// Request timeout in seconds.
    #[arg(short = 't', long = "time", value_name = "SEC")]
    pub timeout: Option<u64>,

    /// Print no output.
    #[arg(short, long)]
    pub silent: bool,

    /// Print each matrix that is sent.
    #[arg(short = 'm', long)]
    pub show_matrix: bool,

    /// Keep the matrix constant across requests (and across profiles with ALL).
    #[arg(short, long)]
    pub constant: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the API result.
    #[arg(short = 'p', long = "print")]
    pub print_result: bool,

    /// Give up polling a job after SEC seconds (counted as a timeout). Unbounded by default.
    #[arg(long, value_name = "SEC")]
    pub poll_deadline: Option<u64>,

    /// Seed for matrix generation, for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Path to config TOML. If omitted, uses ./spp-loadtest.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn dispatch(args: Args) -> Result<()> {
    let mut cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    apply_overrides(&mut cfg, &args);
    cfg.validate()?;

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    let selection = args.profile;
    if let Some(kmh) = selection.nonstandard() {
        warn!("speed profile {kmh} is not one of {STANDARD_PROFILES:?}; the server may reject it");
    }
    let regions = RegionTable::with_overrides(&cfg.regions);
    let bbox = regions.lookup(&args.country)?;
    let country = args.country.to_ascii_lowercase();
    info!(
        "target={}://{}:{}{} country={country} profiles={:?}",
        cfg.target.scheme,
        cfg.target.host,
        cfg.target.port,
        cfg.target.endpoint,
        selection.profiles()
    );

    let ctx = RunContext::from_config(&cfg, &country, bbox);
    let console = Console::new(cfg.output.silent, cfg.output.verbose, cfg.output.color);
    let backend = HttpBackend::new(&cfg.target)?;
    let mut driver = Driver::new(ctx, backend, console);

    let report = driver.run(selection)?;

    if !cfg.output.report_json.is_empty() {
        let path = Path::new(&cfg.output.report_json);
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report: {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    Ok(())
}

/// CLI flags win over the config file.
pub fn apply_overrides(cfg: &mut Config, args: &Args) {
    if let Some(host) = &args.host {
        cfg.target.host = host.clone();
    }
    if let Some(port) = args.port {
        cfg.target.port = port;
    }
    if let Some(scheme) = &args.scheme {
        cfg.target.scheme = scheme.to_ascii_lowercase();
    }
    if let Some(requests) = args.requests {
        cfg.run.requests = requests;
    }
    if let Some(dim) = args.dim {
        cfg.run.dim = dim;
    }
    if let Some(timeout) = args.timeout {
        cfg.run.timeout_seconds = timeout;
    }
    if let Some(deadline) = args.poll_deadline {
        cfg.run.poll_deadline_seconds = deadline;
    }
    if args.seed.is_some() {
        cfg.run.seed = args.seed;
    }
    cfg.run.constant |= args.constant;
    cfg.output.silent |= args.silent;
    cfg.output.verbose |= args.verbose;
    cfg.output.show_matrix |= args.show_matrix;
    cfg.output.print_result |= args.print_result;
    if args.no_color {
        cfg.output.color = false;
    }
    if let Some(path) = &args.report_json {
        cfg.output.report_json = path.display().to_string();
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("spp-loadtest.toml");
    default.exists().then_some(default)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file || cfg.logging.file_path.is_empty() {
        return None;
    }
    Some(PathBuf::from(&cfg.logging.file_path))
}

fn init_logging(
    args: &Args,
    cfg: &Config,
    file_path: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the run output
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create_dir_all {}", parent.display()))?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}
