//! CLI entry point for the sweep-discover SNMP scanner.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use sweep_discover::config::{DiscoverConfig, LivenessMode};
use sweep_discover::coordinator::ScanCoordinator;
use sweep_discover::input;
use sweep_discover::liveness::{AssumeAlive, IcmpProber, LivenessProbe};
use sweep_discover::output::{self, ScanReport};
use sweep_discover::search::CredentialSearcher;
use sweep_discover::snmp::Snmp2Connector;
use sweep_discover::targets;

#[derive(Parser)]
#[command(name = "sweep-discover")]
#[command(about = "Discover SNMP devices and the community strings they accept")]
struct Cli {
    /// File of community strings, one per line, most likely first. Lines are
    /// taken verbatim; only empty lines are skipped.
    #[arg(short = 'c', long)]
    communities: PathBuf,

    /// File of range specifications (a.b.c.d/mask or a.b.c.d), one per line.
    #[arg(short = 'r', long)]
    ranges: PathBuf,

    /// Write results here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Emit a CSV header row.
    #[arg(long)]
    header: bool,

    /// Addresses probed at once (1 = strictly sequential).
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Abandon the scan after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip the ICMP liveness probe and treat every target as reachable.
    #[arg(long)]
    no_ping: bool,

    /// SNMP agent port.
    #[arg(long)]
    port: Option<u16>,

    /// Per-request SNMP timeout in milliseconds.
    #[arg(long)]
    snmp_timeout_ms: Option<u64>,

    /// Config file prefix (default: sweep).
    #[arg(long, default_value = "sweep")]
    config: String,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = resolve_config(&cli)?;
    config.validate()?;

    let communities = input::read_communities(&cli.communities)?;
    let ranges = input::read_ranges(&cli.ranges)?;

    let liveness: Arc<dyn LivenessProbe> = match config.liveness {
        LivenessMode::Icmp => Arc::new(IcmpProber::new(config.ping_timeout())?),
        LivenessMode::Skip => Arc::new(AssumeAlive),
    };
    let connector = Arc::new(Snmp2Connector::new(config.snmp_port, config.snmp_timeout()));
    let searcher = CredentialSearcher::new(connector, communities);
    let coordinator =
        ScanCoordinator::new(liveness, searcher).with_concurrency(config.concurrency);

    let scan_id = Uuid::new_v4();
    let started_at = chrono::Utc::now();
    tracing::info!(scan_id = %scan_id, liveness = ?config.liveness, "Scan starting");

    let (mut store, _) = targets::build_target_set(&ranges);
    let shutdown = spawn_shutdown_signal(config.scan_timeout_secs);
    let summary = coordinator.run(&mut store, shutdown).await;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    match cli.format {
        Format::Csv => {
            let rows = output::write_csv(&store, writer, cli.header)?;
            tracing::info!(scan_id = %scan_id, rows, "Results written");
        }
        Format::Json => {
            let report = ScanReport::new(scan_id, started_at, &store, summary);
            output::write_json(&report, writer)?;
            tracing::info!(scan_id = %scan_id, hosts = report.hosts.len(), "Report written");
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = fmt().with_env_filter(filter).with_writer(io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Flip the shutdown flag on Ctrl-C or when the scan deadline passes.
fn spawn_shutdown_signal(deadline_secs: Option<u64>) -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        let deadline = async {
            match deadline_secs {
                Some(secs) => tokio::time::sleep(std::time::Duration::from_secs(secs)).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Cannot listen for Ctrl-C");
                    return;
                }
                tracing::warn!("Interrupt received, finishing in-flight targets");
            }
            _ = deadline => {
                tracing::warn!(
                    timeout_secs = ?deadline_secs,
                    "Scan deadline reached, finishing in-flight targets"
                );
            }
        }
        let _ = tx.send(true);
    });
    rx
}

fn resolve_config(cli: &Cli) -> anyhow::Result<DiscoverConfig> {
    let mut config = load_discover_config(&cli.config)?;
    if let Some(n) = cli.concurrency {
        config.concurrency = n;
    }
    if let Some(secs) = cli.timeout {
        config.scan_timeout_secs = Some(secs);
    }
    if let Some(port) = cli.port {
        config.snmp_port = port;
    }
    if let Some(ms) = cli.snmp_timeout_ms {
        config.snmp_timeout_ms = ms;
    }
    if cli.no_ping {
        config.liveness = LivenessMode::Skip;
    }
    Ok(config)
}

fn load_discover_config(file_prefix: &str) -> anyhow::Result<DiscoverConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("SWEEP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<DiscoverConfig>("discover") {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => Ok(DiscoverConfig::default()),
        Err(e) => Err(e.into()),
    }
}
