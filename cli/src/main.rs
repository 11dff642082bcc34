//! Texnouz CSMS Mobile: headless screen simulator
//!
//! Drives the transaction details screen against an in-memory central
//! server so refresh cadence, error handling and configuration can be
//! observed from the log without a device.
//!
//! ```sh
//! # Watch a live charging session for one minute
//! csms-mobile-sim --duration 60
//!
//! # Custom config path and faster refresh
//! csms-mobile-sim --config ./config.toml --interval 2
//!
//! # Open a transaction that does not exist
//! csms-mobile-sim --transaction-id 999
//!
//! # Validate config without running
//! csms-mobile-sim --check
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use texnouz_mobile::application::screens::{transaction_details_screen, ErrorReportService};
use texnouz_mobile::application::{
    ErrorRecovery, ScreenContext, SessionSecurityContext, TransactionView,
};
use texnouz_mobile::config::AppConfig;
use texnouz_mobile::domain::{
    session_channel, Capability, ChargingStation, Connector, ConnectorStatus, ErrorReport,
    FeatureFlag, InactivityStatus, Session, SiteArea, Transaction, TransactionDetails,
    TransactionStop, UserRef,
};
use texnouz_mobile::infrastructure::{init_tracing, InMemoryCentralServer, LogNavigator, LogNotifier};
use texnouz_mobile::{ScreenRegistry, ScreenState};

const DEMO_TRANSACTION: i64 = 4242;
const DEMO_CHARGER: &str = "TX-CS-01";
const DEMO_SITE: &str = "site-paris-01";

/// Texnouz CSMS Mobile: run the transaction details screen headless.
#[derive(Parser, Debug)]
#[command(
    name = "csms-mobile-sim",
    version,
    about = "Headless simulator of the EV charging mobile screens",
    long_about = "Mounts the transaction details screen against an in-memory \
                  central server and logs every state transition.\n\n\
                  Default config: ~/.config/csms-mobile/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CSMS_MOBILE_CONFIG")]
    config: Option<PathBuf>,

    /// Transaction to open on the details screen.
    #[arg(short, long, default_value_t = DEMO_TRANSACTION)]
    transaction_id: i64,

    /// How long the screen stays mounted, in seconds.
    #[arg(short, long, default_value_t = 30)]
    duration: u64,

    /// Override the auto-refresh interval, in seconds.
    #[arg(long)]
    interval: Option<u64>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Send a demo error report before exiting.
    #[arg(long)]
    report: bool,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(texnouz_mobile::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            warn!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using default configuration.");
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(secs) = cli.interval {
        if secs == 0 {
            error!("--interval must be greater than 0");
            return Err("invalid refresh interval".into());
        }
        info!("CLI override: refresh.interval_secs = {}", secs);
        config.refresh.interval_secs = secs;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file      : {}", config_path.display());
        println!("   Refresh interval : {}s", config.refresh.interval_secs);
        println!("   Fetch timeout    : {:?}", config.refresh.fetch_timeout());
        println!("   Log level        : {}", config.logging.level);
        return Ok(());
    }

    // ── Wire the host ──────────────────────────────────────────
    let server = Arc::new(InMemoryCentralServer::new().with_latency(Duration::from_millis(150)));
    seed(&server);

    let (_session_tx, session) = session_channel(Some(Session::authenticated([
        Capability::SiteAdmin(DEMO_SITE.to_string()),
        Capability::Feature(FeatureFlag::Pricing),
    ])));
    let recovery = ErrorRecovery::new(Arc::new(LogNotifier), Arc::new(LogNavigator));
    let context = ScreenContext {
        security: Arc::new(SessionSecurityContext),
        session,
        recovery: recovery.clone(),
        refresh: config.refresh.clone(),
    };
    let registry = ScreenRegistry::shared();

    // ── Mount the screen ───────────────────────────────────────
    let screen = transaction_details_screen(cli.transaction_id, server.clone(), &config, context);
    let mut states = screen.subscribe();
    let first = screen.on_mount();
    registry.register(Arc::new(screen.clone()));

    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            log_state(&state);
        }
    });

    let charging = tokio::spawn(simulate_charging(server.clone(), cli.transaction_id));
    info!(outcome = ?first.await, "Initial load finished");

    // Background the app halfway through to show auto-refresh suspending.
    let half = Duration::from_secs(cli.duration / 2);
    tokio::time::sleep(half).await;
    registry.set_foreground(false);
    tokio::time::sleep(Duration::from_secs(3).min(half)).await;
    registry.set_foreground(true);
    tokio::time::sleep(half).await;

    screen.on_unmount();
    registry.unregister(&screen.id());
    charging.abort();

    if cli.report {
        let service = ErrorReportService::new(server.clone(), recovery, &config);
        let report = ErrorReport::new(
            "+33 6 12 34 56 78",
            "Connector A stuck",
            "The cable cannot be unplugged after the session ended",
        );
        if let Err(e) = service.submit(&report).await {
            error!("Error report failed: {}", e);
        }
    }

    info!(requests = server.request_count(), "Simulation finished");
    Ok(())
}

fn log_state(state: &ScreenState<TransactionDetails, TransactionView>) {
    match (&state.derived, &state.last_error) {
        (_, Some(err)) => warn!(phase = ?state.phase, generation = state.generation, "{}", err),
        (Some(view), None) => info!(
            phase = ?state.phase,
            generation = state.generation,
            soc = %view.state_of_charge,
            elapsed = %view.elapsed,
            consumption = %view.consumption_kwh,
            price = view.price.as_deref().unwrap_or("-"),
            "Screen state"
        ),
        (None, None) => info!(phase = ?state.phase, "Screen state"),
    }
}

fn seed(server: &InMemoryCentralServer) {
    let driver = UserRef {
        id: "user-1".into(),
        name: "MARTIN".into(),
        first_name: Some("Claire".into()),
    };
    server.upsert_transaction(Transaction {
        id: DEMO_TRANSACTION,
        charge_box_id: DEMO_CHARGER.into(),
        connector_id: 1,
        site_id: Some(DEMO_SITE.into()),
        user_id: Some(driver.id.clone()),
        user: Some(driver),
        timestamp: Utc::now() - chrono::Duration::minutes(42),
        state_of_charge: Some(18),
        stop: None,
    });
    server.set_site_image(DEMO_SITE, "data:image/png;base64,iVBORw0KGgo=");
    server.upsert_charger(ChargingStation {
        id: DEMO_CHARGER.into(),
        site_area: Some(SiteArea {
            id: "area-1".into(),
            site_id: DEMO_SITE.into(),
        }),
        connectors: vec![
            Connector {
                connector_id: 1,
                status: ConnectorStatus::Charging,
            },
            Connector {
                connector_id: 2,
                status: ConnectorStatus::Available,
            },
        ],
    });
}

/// Advance the session every few seconds, then stop it.
async fn simulate_charging(server: Arc<InMemoryCentralServer>, transaction_id: i64) {
    let mut ticks = tokio::time::interval(Duration::from_secs(4));
    for step in 1..=6u8 {
        ticks.tick().await;
        server.update_transaction(transaction_id, |tx| {
            tx.state_of_charge = Some(18 + step * 10);
        });
    }
    ticks.tick().await;
    server.update_transaction(transaction_id, |tx| {
        tx.stop = Some(TransactionStop {
            timestamp: Utc::now(),
            user_id: tx.user_id.clone(),
            user: tx.user.clone(),
            total_inactivity_secs: 240,
            extra_inactivity_secs: Some(0),
            inactivity_status: Some(InactivityStatus::Info),
            total_consumption_wh: 27_540.0,
            price: Some(Decimal::new(1128, 2)),
            price_unit: Some("EUR".into()),
            state_of_charge: Some(80),
        });
    });
    info!(transaction_id, "Charging session stopped");
}
