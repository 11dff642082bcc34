//! In-crate test doubles and fixtures

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};

use crate::application::errors::ErrorRecovery;
use crate::application::ports::{DataFetcher, Navigation, Navigator, Notifier, Route};
use crate::application::screen::ScreenContext;
use crate::application::security::SessionSecurityContext;
use crate::config::RefreshConfig;
use crate::domain::{
    session_channel, ChargingStation, Connector, ConnectorStatus, InactivityStatus, Resource,
    Session, SiteArea, Transaction, TransactionDetails, TransactionStop, UserRef,
};
use crate::shared::TransportError;

// ── Host doubles ───────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn show_success(&self, message: &str) {
        self.successes.lock().push(message.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Navigation> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn back(&self) {
        self.routes.lock().push(Navigation::Back);
    }

    fn force_to(&self, route: Route) {
        self.routes.lock().push(Navigation::To(route));
    }
}

pub struct TestHost {
    pub context: ScreenContext,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: watch::Sender<Option<Arc<Session>>>,
}

pub fn test_host(refresh: RefreshConfig, session: Option<Session>) -> TestHost {
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let (session_tx, session_rx) = session_channel(session);
    TestHost {
        context: ScreenContext {
            security: Arc::new(SessionSecurityContext),
            session: session_rx,
            recovery: ErrorRecovery::new(notifier.clone(), navigator.clone()),
            refresh,
        },
        notifier,
        navigator,
        session: session_tx,
    }
}

// ── Scripted fetcher ───────────────────────────────────────────

enum Step<R> {
    Reply(Result<R, TransportError>),
    Gated(oneshot::Receiver<Result<R, TransportError>>),
}

/// Fetcher answering from a script, recording concurrency.
pub struct ScriptedFetcher<R: Resource> {
    script: Mutex<VecDeque<Step<R>>>,
    requested: Mutex<Vec<R::Id>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl<R: Resource> ScriptedFetcher<R> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            requested: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn reply(&self, result: Result<R, TransportError>) {
        self.script.lock().push_back(Step::Reply(result));
    }

    /// Next fetch blocks until the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<Result<R, TransportError>> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().push_back(Step::Gated(rx));
        tx
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().len()
    }

    pub fn requested(&self) -> Vec<R::Id> {
        self.requested.lock().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Resource> DataFetcher<R> for ScriptedFetcher<R> {
    async fn fetch(&self, id: &R::Id) -> Result<R, TransportError> {
        self.requested.lock().push(id.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let step = self.script.lock().pop_front();
        let result = match step {
            Some(Step::Reply(result)) => result,
            Some(Step::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::no_response("gate dropped"))),
            None => Err(TransportError::no_response("script exhausted")),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// ── Fixtures ───────────────────────────────────────────────────

pub fn sample_transaction(id: i64) -> Transaction {
    Transaction {
        id,
        charge_box_id: format!("CB-{:03}", id),
        connector_id: 1,
        site_id: Some("site-1".into()),
        user_id: Some("u1".into()),
        user: Some(UserRef {
            id: "u1".into(),
            name: "DOE".into(),
            first_name: Some("Jane".into()),
        }),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        state_of_charge: Some(20),
        stop: None,
    }
}

pub fn sample_stop(tx: &Transaction, elapsed_secs: i64) -> TransactionStop {
    TransactionStop {
        timestamp: tx.timestamp + Duration::seconds(elapsed_secs),
        user_id: tx.user_id.clone(),
        user: tx.user.clone(),
        total_inactivity_secs: 0,
        extra_inactivity_secs: None,
        inactivity_status: Some(InactivityStatus::Info),
        total_consumption_wh: 12_345.0,
        price: None,
        price_unit: None,
        state_of_charge: Some(80),
    }
}

pub fn sample_details(id: i64) -> TransactionDetails {
    TransactionDetails {
        transaction: sample_transaction(id),
        site_image: None,
    }
}

pub fn sample_station(id: &str) -> ChargingStation {
    ChargingStation {
        id: id.to_string(),
        site_area: Some(SiteArea {
            id: "area-1".into(),
            site_id: "site-1".into(),
        }),
        connectors: vec![
            Connector {
                connector_id: 1,
                status: ConnectorStatus::Available,
            },
            Connector {
                connector_id: 2,
                status: ConnectorStatus::Faulted,
            },
        ],
    }
}
