//! In-memory central server for development, demos and testing

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::application::ports::CentralServerProvider;
use crate::domain::{ChargingStation, ErrorReport, Transaction};
use crate::shared::TransportError;

const NOT_FOUND: u16 = 404;
const OBJECT_DOES_NOT_EXIST: u16 = 550;

/// Remote call of [`CentralServerProvider`], used to script failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Transaction,
    SiteImage,
    Charger,
    ErrorReport,
}

/// Central server double backed by concurrent maps
pub struct InMemoryCentralServer {
    transactions: DashMap<i64, Transaction>,
    site_images: DashMap<String, String>,
    chargers: DashMap<String, ChargingStation>,
    reports: Mutex<Vec<ErrorReport>>,
    failures: DashMap<Endpoint, VecDeque<TransportError>>,
    latency: Option<Duration>,
    requests: AtomicUsize,
}

impl InMemoryCentralServer {
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
            site_images: DashMap::new(),
            chargers: DashMap::new(),
            reports: Mutex::new(Vec::new()),
            failures: DashMap::new(),
            latency: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Delay every call, simulating a slow network.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn upsert_transaction(&self, transaction: Transaction) {
        self.transactions.insert(transaction.id, transaction);
    }

    /// Mutate a stored transaction in place; returns false if unknown.
    pub fn update_transaction(&self, id: i64, update: impl FnOnce(&mut Transaction)) -> bool {
        match self.transactions.get_mut(&id) {
            Some(mut tx) => {
                update(tx.value_mut());
                true
            }
            None => false,
        }
    }

    pub fn set_site_image(&self, site_id: impl Into<String>, image: impl Into<String>) {
        self.site_images.insert(site_id.into(), image.into());
    }

    pub fn upsert_charger(&self, station: ChargingStation) {
        self.chargers.insert(station.id.clone(), station);
    }

    /// Queue a failure for the next call of `endpoint`.
    pub fn fail_next(&self, endpoint: Endpoint, error: TransportError) {
        self.failures.entry(endpoint).or_default().push_back(error);
    }

    /// Reports received so far
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().clone()
    }

    /// Total number of calls served, failed ones included
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn call(&self, endpoint: Endpoint) -> Result<(), TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let scripted = self
            .failures
            .get_mut(&endpoint)
            .and_then(|mut queue| queue.pop_front());
        match scripted {
            Some(error) => {
                debug!(?endpoint, %error, "Scripted failure");
                Err(error)
            }
            None => Ok(()),
        }
    }
}

impl Default for InMemoryCentralServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CentralServerProvider for InMemoryCentralServer {
    async fn get_transaction(&self, transaction_id: i64) -> Result<Transaction, TransportError> {
        self.call(Endpoint::Transaction).await?;
        self.transactions
            .get(&transaction_id)
            .map(|tx| tx.value().clone())
            .ok_or_else(|| TransportError::status(OBJECT_DOES_NOT_EXIST))
    }

    async fn get_site_image(&self, site_id: &str) -> Result<String, TransportError> {
        self.call(Endpoint::SiteImage).await?;
        self.site_images
            .get(site_id)
            .map(|image| image.value().clone())
            .ok_or_else(|| TransportError::status(NOT_FOUND))
    }

    async fn get_charger(&self, charger_id: &str) -> Result<ChargingStation, TransportError> {
        self.call(Endpoint::Charger).await?;
        self.chargers
            .get(charger_id)
            .map(|station| station.value().clone())
            .ok_or_else(|| TransportError::status(OBJECT_DOES_NOT_EXIST))
    }

    async fn send_error_report(&self, report: &ErrorReport) -> Result<(), TransportError> {
        self.call(Endpoint::ErrorReport).await?;
        self.reports.lock().push(report.clone());
        Ok(())
    }
}
