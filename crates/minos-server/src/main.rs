//! Minos scoring gateway - entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use minos_server::{Server, ServerConfig, DEFAULT_PORT};
use minos_store::{CacheStore, RedisBackend};
use minos_telemetry::{init_logging, LogConfig};

/// Environment variable naming the cache server URL.
const STORE_URL_ENV: &str = "MINOS_STORE_URL";

/// Default cache server URL.
const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";

/// Command-line arguments.
struct Args {
    /// Listen port.
    port: u16,

    /// Log file path; stdout when absent.
    log: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut port = DEFAULT_PORT;
        let mut log = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--port" | "-p" => {
                    let value = args.next().unwrap_or_default();
                    port = match value.parse() {
                        Ok(port) => port,
                        Err(_) => {
                            eprintln!("Invalid port: {value}");
                            std::process::exit(1);
                        }
                    };
                }
                "--log" | "-l" => {
                    log = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("minos-server {}", minos_server::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { port, log }
    }
}

fn print_help() {
    println!(
        r"Minos - scoring gateway

USAGE:
    minos-server [OPTIONS]

OPTIONS:
    -p, --port <PORT>    Listen port (default: 8080)
    -l, --log <PATH>     Append logs to a file instead of stdout
    -h, --help           Print help information
    -v, --version        Print version information

ENVIRONMENT VARIABLES:
    MINOS_STORE_URL      Cache server URL (default: redis://127.0.0.1:6379)

EXAMPLES:
    # Run on the default port, logging to stdout
    minos-server

    # Run on port 9090, logging to a file
    minos-server --port 9090 --log /var/log/minos.log
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_config = match &args.log {
        Some(path) => LogConfig::default().with_file(path),
        None => LogConfig::default(),
    };
    init_logging(&log_config).context("failed to initialize logging")?;

    let store_url =
        std::env::var(STORE_URL_ENV).unwrap_or_else(|_| DEFAULT_STORE_URL.to_string());
    let backend = RedisBackend::connect(&store_url)
        .await
        .with_context(|| format!("failed to connect to cache at {store_url}"))?;
    let store = Arc::new(CacheStore::new(backend));

    let config = ServerConfig::builder().port(args.port).build();
    info!("Starting minos-server v{} at {}", minos_server::VERSION, config.http_addr());

    let server = Server::new(config, store);
    server.run().await.context("server error")?;
    Ok(())
}
