//! Transaction domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Resource;

/// Inactivity severity computed by the server when a session stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InactivityStatus {
    #[serde(rename = "I")]
    Info,
    #[serde(rename = "W")]
    Warning,
    #[serde(rename = "E")]
    Error,
}

/// Minimal user reference embedded in transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    pub name: String,
    pub first_name: Option<String>,
}

impl UserRef {
    /// "NAME First" display form
    pub fn display_name(&self) -> String {
        match &self.first_name {
            Some(first) if !first.is_empty() => format!("{} {}", self.name, first),
            _ => self.name.clone(),
        }
    }
}

/// Completion data, present once the charging session has stopped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStop {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub user: Option<UserRef>,
    pub total_inactivity_secs: i64,
    pub extra_inactivity_secs: Option<i64>,
    pub inactivity_status: Option<InactivityStatus>,
    pub total_consumption_wh: f64,
    pub price: Option<Decimal>,
    pub price_unit: Option<String>,
    pub state_of_charge: Option<u8>,
}

impl TransactionStop {
    /// Recorded inactivity plus the optional extra inactivity after stop
    pub fn total_inactivity(&self) -> i64 {
        self.total_inactivity_secs + self.extra_inactivity_secs.unwrap_or(0)
    }
}

/// Charging transaction as returned by the central server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "chargeBoxID")]
    pub charge_box_id: String,
    pub connector_id: u32,
    #[serde(rename = "siteID")]
    pub site_id: Option<String>,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub user: Option<UserRef>,
    /// When the transaction started
    pub timestamp: DateTime<Utc>,
    /// State of charge at start (%)
    pub state_of_charge: Option<u8>,
    pub stop: Option<TransactionStop>,
}

impl Transaction {
    /// The user who stopped the session, when different from the one who started it
    pub fn stopped_by_other(&self) -> Option<&UserRef> {
        let stop = self.stop.as_ref()?;
        if stop.user_id == self.user_id {
            return None;
        }
        stop.user.as_ref()
    }
}

impl Resource for Transaction {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn scope_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }
}

/// Transaction together with the image of its site, as shown on the details screen
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDetails {
    pub transaction: Transaction,
    /// Data URI; `None` when the site has no image
    pub site_image: Option<String>,
}

impl Resource for TransactionDetails {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.transaction.id
    }

    fn scope_id(&self) -> Option<&str> {
        self.transaction.scope_id()
    }
}

// ── Tests ──────────────────────────────────────────────────────
