// # ddns-sync - one-shot DDNS synchronizer
//
// This binary is a THIN integration layer: it reads configuration from the
// environment, initializes logging, wires the Linode provider and the HTTP
// IP probe into a `SyncEngine`, runs exactly one pass and maps the result
// to an exit status. All DNS logic lives in ddns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Required
// - `LINODE_TOKEN`: Linode API token
// - `DNS_HOSTNAME`: Record to keep in sync (e.g. home.example.com)
//
// ### Optional
// - `DEBUG`: `true` enables request/response logging
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `DDNS_MODE`: `dry-run` performs lookups but skips the update
// - `DDNS_IP_ECHO_URL`: IP echo endpoint (default: https://ifconfig.co/ip)
// - `DDNS_IP_ECHO_INSECURE`: `true` disables TLS verification of the probe
// - `LINODE_API_URL`: Linode API base URL
//
// ## Example
//
// ```bash
// export LINODE_TOKEN=your_token
// export DNS_HOSTNAME=home.example.com
//
// ddns-sync
// ```
//
// Scheduling (cron, systemd timers) is left to the operator; run one
// instance at a time per record.

use anyhow::{Context, Result};
use ddns_core::config::{DEFAULT_IP_ECHO_URL, HostnameSpec, IpSourceConfig, ProviderConfig, SyncConfig};
use ddns_core::{SyncEngine, UpdateOutcome};
use ddns_ip_http::HttpIpSource;
use ddns_provider_linode::LinodeProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the run
///
/// Every failure class shares one non-zero code; the log line carries the
/// detail.
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    /// Record in sync or updated
    Success = 0,
    /// Configuration, lookup, provider or network failure
    Failure = 1,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// How the DEBUG variable was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebugSetting {
    Unset,
    Disabled,
    Enabled,
}

/// Application configuration as read from the environment
struct Config {
    api_token: String,
    hostname: String,
    debug: DebugSetting,
    log_level: String,
    dry_run: bool,
    ip_echo_url: String,
    ip_echo_insecure: bool,
    api_url: Option<String>,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<REDACTED>")
            .field("hostname", &self.hostname)
            .field("debug", &self.debug)
            .field("log_level", &self.log_level)
            .field("dry_run", &self.dry_run)
            .field("ip_echo_url", &self.ip_echo_url)
            .field("ip_echo_insecure", &self.ip_echo_insecure)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a key lookup function
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_token = lookup("LINODE_TOKEN")
            .context("Could not find LINODE_TOKEN environment variable")?;
        let hostname = lookup("DNS_HOSTNAME")
            .context("Could not find DNS_HOSTNAME environment variable")?;

        let debug = match lookup("DEBUG") {
            None => DebugSetting::Unset,
            Some(v) if is_affirmative(&v) => DebugSetting::Enabled,
            Some(_) => DebugSetting::Disabled,
        };

        Ok(Self {
            api_token,
            hostname,
            debug,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            dry_run: lookup("DDNS_MODE")
                .is_some_and(|m| m.eq_ignore_ascii_case("dry-run")),
            ip_echo_url: lookup("DDNS_IP_ECHO_URL")
                .unwrap_or_else(|| DEFAULT_IP_ECHO_URL.to_string()),
            ip_echo_insecure: lookup("DDNS_IP_ECHO_INSECURE").is_some_and(|v| is_affirmative(&v)),
            api_url: lookup("LINODE_API_URL").filter(|u| !u.is_empty()),
        })
    }

    /// Validate the configuration and build the typed run configuration
    ///
    /// Nothing here touches the network.
    fn validate(&self) -> Result<SyncConfig> {
        if self.api_token.trim().is_empty() {
            anyhow::bail!(
                "LINODE_TOKEN is required. \
                Set it via: export LINODE_TOKEN=your_token"
            );
        }

        log_level(&self.log_level)?;

        let hostname = HostnameSpec::parse(self.hostname.trim())?;

        let config = SyncConfig {
            hostname,
            provider: ProviderConfig {
                api_token: self.api_token.clone(),
                api_url: self.api_url.clone(),
                debug: self.debug == DebugSetting::Enabled,
                dry_run: self.dry_run,
            },
            ip_source: IpSourceConfig {
                url: self.ip_echo_url.clone(),
                accept_invalid_certs: self.ip_echo_insecure,
            },
        };
        config.validate()?;

        Ok(config)
    }

    /// The effective log level; DEBUG raises it to at least debug
    fn effective_log_level(&self) -> Level {
        let level = log_level(&self.log_level).unwrap_or(Level::INFO);
        if self.debug == DebugSetting::Enabled && level < Level::DEBUG {
            Level::DEBUG
        } else {
            level
        }
    }
}

fn is_affirmative(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn log_level(value: &str) -> Result<Level> {
    match value.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            value
        ),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return SyncExitCode::Failure.into();
        }
    };

    // Validate configuration
    let sync_config = match config.validate() {
        Ok(sync_config) => sync_config,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return SyncExitCode::Failure.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.effective_log_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::Failure.into();
    }

    if config.debug == DebugSetting::Unset {
        info!("Could not find DEBUG environment variable, assuming false.");
    }

    // Calls run strictly one after another; a current-thread runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::Failure.into();
        }
    };

    match rt.block_on(run(sync_config)) {
        Ok(UpdateOutcome::NoChangeNeeded { .. }) => {
            info!("Record already in sync");
            SyncExitCode::Success.into()
        }
        Ok(UpdateOutcome::Updated { name, target }) => {
            info!("Record {} now points at {}", name, target);
            SyncExitCode::Success.into()
        }
        Err(e) => {
            error!("{:#}", e);
            SyncExitCode::Failure.into()
        }
    }
}

/// Build the components and run one synchronization pass
async fn run(config: SyncConfig) -> Result<UpdateOutcome> {
    if config.provider.dry_run {
        warn!("DDNS_MODE=dry-run: the record will not be modified");
    }

    let provider = LinodeProvider::from_config(&config.provider)?;
    let ip_source = HttpIpSource::from_config(&config.ip_source)?;

    let engine = SyncEngine::new(Box::new(provider), Box::new(ip_source), config.hostname);
    let outcome = engine.run_once().await?;

    Ok(outcome)
}
