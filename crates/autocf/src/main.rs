// # autocf - Cloudflare record reconciler
//
// One-shot binary: compare the zone's watched `A` records against the
// current public IPv4, fix content and proxy flags, report the changes to
// Telegram, exit.
//
// This is a THIN wiring layer only. All reconciliation logic lives in
// autocf-core; this binary:
// 1. Reads settings from environment variables
// 2. Initializes tracing
// 3. Builds the Cloudflare client, the IP source and the messenger
// 4. Runs a single reconciliation pass
//
// ## Configuration
//
// All configuration is done via environment variables (upper- or
// lower-case spelling):
//
// - `CLOUDFLARE_API_KEY`: account API key (required)
// - `CLOUDFLARE_EMAIL`: account email (required)
// - `CLOUDFLARE_BASE_API`: API base URL
//   (default: https://api.cloudflare.com/client/v4)
// - `TELEGRAM_TOKEN`: bot token for notifications (required)
// - `TELEGRAM_USER_ID`: chat id to notify, integer (required)
// - `WATCHED_COMMON_RECORDS`: hostnames to keep proxied,
//   JSON array or comma-separated
// - `WATCHED_NOCACHED_RECORDS`: hostnames to keep unproxied,
//   JSON array or comma-separated
// - `LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_KEY=your_key
// export CLOUDFLARE_EMAIL=admin@example.com
// export TELEGRAM_TOKEN=bot_token
// export TELEGRAM_USER_ID=123456789
// export WATCHED_COMMON_RECORDS=example.com,www.example.com
// export WATCHED_NOCACHED_RECORDS='["vpn.example.com"]'
//
// autocf
// ```

use std::process::ExitCode;

use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use autocf_cloudflare::CloudflareProvider;
use autocf_core::{DnsProvider, Error, Reconciler, Result, Settings};
use autocf_ip_http::HttpIpSource;
use autocf_notify_telegram::TelegramMessenger;

/// Exit codes for different termination scenarios
///
/// - 0: Reconciliation completed
/// - 1: Configuration error (nothing was touched)
/// - 2: Runtime error (the pass aborted; applied updates stay applied)
#[derive(Debug, Clone, Copy)]
enum AppExitCode {
    /// Reconciliation completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (a call to an external service failed)
    RuntimeError = 2,
}

impl From<AppExitCode> for ExitCode {
    fn from(code: AppExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load settings from environment
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return AppExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let log_level = match settings.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return AppExitCode::ConfigError.into();
    }

    // The pass is strictly sequential; a single-threaded runtime is all it
    // needs.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return AppExitCode::RuntimeError.into();
        }
    };

    match rt.block_on(run(&settings)) {
        Ok(()) => {
            info!("Reconciliation completed");
            AppExitCode::Success.into()
        }
        Err(e @ Error::Config(_)) => {
            error!("{e}");
            AppExitCode::ConfigError.into()
        }
        Err(e) => {
            error!("Reconciliation failed: {e}");
            AppExitCode::RuntimeError.into()
        }
    }
}

/// Run one reconciliation pass
async fn run(settings: &Settings) -> Result<()> {
    for name in settings.overlap() {
        warn!("'{name}' is on both watch-lists and will be kept unproxied");
    }

    let provider = CloudflareProvider::from_settings(settings)?;
    let zone = provider.resolve_zone().await?;
    info!("Managing zone {zone}");

    let reconciler = Reconciler::new(
        Box::new(provider),
        Box::new(HttpIpSource::default()),
        Box::new(TelegramMessenger::from_settings(settings)),
        settings.watchlist(),
    );

    reconciler.run(&zone).await
}
