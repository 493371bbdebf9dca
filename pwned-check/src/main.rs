use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use pwned_range_client::{ClientConfig, PwnedPasswordsClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Client(#[from] pwned_range_client::Error),

    #[error("failed to read passwords from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("check task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Parser, Debug)]
#[command(name = "pwned-check")]
#[command(about = "Check passwords against the Pwned Passwords range API without revealing them")]
struct Args {
    /// Passwords to check. Read from stdin, one per line, when omitted
    passwords: Vec<String>,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the range API
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Minimum breach count for a password to count as pwned
    #[arg(short = 'm', long)]
    min_frequency: Option<u64>,

    /// Ask the API to pad responses
    #[arg(long)]
    padding: bool,

    /// Log lookup outcomes (equivalent to RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(path: &Path) -> Result<ClientConfig, Error> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| Error::ReadConfig { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw).map_err(|source| Error::ParseConfig { path: path.to_path_buf(), source })
}

fn build_config(args: &Args) -> Result<ClientConfig, Error> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }
    if let Some(min_frequency) = args.min_frequency {
        config = config.with_minimum_frequency(min_frequency);
    }
    if args.padding {
        config = config.with_padding(true);
    }

    Ok(config)
}

async fn read_stdin_passwords() -> Result<Vec<String>, Error> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut passwords = Vec::new();
    while let Some(line) = lines.next_line().await.map_err(Error::Stdin)? {
        if !line.is_empty() {
            passwords.push(line);
        }
    }
    Ok(passwords)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    let args = Args::parse();
    setup_logger(args.verbose);

    let config = build_config(&args)?;
    let client = PwnedPasswordsClient::new(config)?;

    let passwords = if args.passwords.is_empty() {
        read_stdin_passwords().await?
    } else {
        args.passwords
    };
    info!(count = passwords.len(), base_url = %client.config().base_url, "checking passwords");

    let mut checks = JoinSet::new();
    for (index, password) in passwords.into_iter().enumerate() {
        let client = client.clone();
        checks.spawn(async move { (index, client.is_pwned(&password).await) });
    }

    let mut results = Vec::with_capacity(checks.len());
    while let Some(result) = checks.join_next().await {
        results.push(result?);
    }
    results.sort_unstable_by_key(|(index, _)| *index);

    // Output only carries positions, never the passwords themselves.
    let mut any_pwned = false;
    for (index, pwned) in results {
        println!("{index}\t{}", if pwned { "pwned" } else { "ok" });
        any_pwned |= pwned;
    }

    Ok(if any_pwned { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
