use chrono::{DateTime, Utc};

use super::format::{connector_letter, format_currency, format_duration_hhmmss, format_kwh};
use super::ViewProjection;
use crate::application::security::Capabilities;
use crate::config::ProjectionConfig;
use crate::domain::{FeatureFlag, InactivityStatus, TransactionDetails, TransactionStop};

/// Display state of the transaction details screen
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionView {
    pub title: String,
    pub connector: String,
    pub site_image: Option<String>,
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub user_name: Option<String>,
    /// Set when someone other than the starter stopped the session
    pub stopped_by: Option<String>,
    pub elapsed: String,
    pub inactivity: String,
    pub total_inactivity_secs: i64,
    pub inactivity_status: Option<InactivityStatus>,
    pub consumption_kwh: String,
    /// "before > after" state of charge
    pub state_of_charge: String,
    pub state_of_charge_delta: Option<i16>,
    /// `None` when the pricing component is disabled for the viewer
    pub price: Option<String>,
    pub price_unit: String,
    pub is_admin: bool,
    pub is_site_admin: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionProjector {
    config: ProjectionConfig,
}

impl TransactionProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    fn placeholder(&self) -> String {
        self.config.placeholder.clone()
    }

    fn price(&self, stop: Option<&TransactionStop>) -> (String, String) {
        match stop {
            Some(TransactionStop {
                price: Some(price),
                price_unit: Some(unit),
                ..
            }) => (format_currency(*price, unit), unit.clone()),
            _ => (self.placeholder(), self.placeholder()),
        }
    }
}

impl ViewProjection<TransactionDetails> for TransactionProjector {
    type View = TransactionView;

    fn project(&self, details: &TransactionDetails, capabilities: &Capabilities) -> TransactionView {
        let tx = &details.transaction;
        let stop = tx.stop.as_ref();

        let (elapsed, inactivity, total_inactivity_secs) = match stop {
            Some(stop) => {
                let elapsed_secs = (stop.timestamp - tx.timestamp).num_seconds();
                let inactivity_secs = stop.total_inactivity();
                (
                    format_duration_hhmmss(elapsed_secs),
                    format_duration_hhmmss(inactivity_secs),
                    inactivity_secs,
                )
            }
            None => (self.placeholder(), self.placeholder(), 0),
        };

        let (state_of_charge, state_of_charge_delta) =
            match (tx.state_of_charge, stop.and_then(|s| s.state_of_charge)) {
                (Some(before), Some(after)) => (
                    format!("{} > {}", before, after),
                    Some(i16::from(after) - i16::from(before)),
                ),
                _ => (self.placeholder(), None),
            };

        let pricing_active = capabilities.is_feature_active(FeatureFlag::Pricing);
        let (price, price_unit) = self.price(stop);

        TransactionView {
            title: tx.charge_box_id.clone(),
            connector: connector_letter(tx.connector_id)
                .map(String::from)
                .unwrap_or_else(|| self.placeholder()),
            site_image: details.site_image.clone(),
            started_at: tx.timestamp,
            stopped_at: stop.map(|s| s.timestamp),
            user_name: tx.user.as_ref().map(|u| u.display_name()),
            stopped_by: tx.stopped_by_other().map(|u| u.display_name()),
            elapsed,
            inactivity,
            total_inactivity_secs,
            inactivity_status: stop.and_then(|s| s.inactivity_status),
            consumption_kwh: stop
                .map(|s| format_kwh(s.total_consumption_wh))
                .unwrap_or_else(|| self.placeholder()),
            state_of_charge,
            state_of_charge_delta,
            price: pricing_active.then_some(price),
            price_unit,
            is_admin: capabilities.is_admin(),
            is_site_admin: capabilities.is_resource_site_admin(),
        }
    }
}
