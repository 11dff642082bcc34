//! Charging station domain entity

use serde::{Deserialize, Serialize};

use crate::domain::Resource;

/// Connector status reported by the station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectorStatus {
    #[default]
    Available,
    Preparing,
    Charging,
    #[serde(rename = "SuspendedEV")]
    SuspendedEv,
    #[serde(rename = "SuspendedEVSE")]
    SuspendedEvse,
    Finishing,
    Reserved,
    Unavailable,
    Faulted,
}

impl std::fmt::Display for ConnectorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Available => "Available",
            Self::Preparing => "Preparing",
            Self::Charging => "Charging",
            Self::SuspendedEv => "SuspendedEV",
            Self::SuspendedEvse => "SuspendedEVSE",
            Self::Finishing => "Finishing",
            Self::Reserved => "Reserved",
            Self::Unavailable => "Unavailable",
            Self::Faulted => "Faulted",
        };
        f.write_str(s)
    }
}

/// Connector on a charging station (ids are 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub connector_id: u32,
    #[serde(default)]
    pub status: ConnectorStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteArea {
    pub id: String,
    #[serde(rename = "siteID")]
    pub site_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStation {
    pub id: String,
    pub site_area: Option<SiteArea>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl ChargingStation {
    /// Connector by its 1-based id as passed in navigation params
    pub fn connector(&self, connector_id: u32) -> Option<&Connector> {
        let index = connector_id.checked_sub(1)?;
        self.connectors.get(index as usize)
    }
}

impl Resource for ChargingStation {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn scope_id(&self) -> Option<&str> {
        self.site_area.as_ref().map(|area| area.site_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> ChargingStation {
        ChargingStation {
            id: "CS-1".into(),
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
                    status: ConnectorStatus::Charging,
                },
            ],
        }
    }

    #[test]
    fn connector_lookup_is_one_based() {
        let cs = station();
        assert_eq!(cs.connector(2).map(|c| c.status), Some(ConnectorStatus::Charging));
        assert!(cs.connector(0).is_none());
        assert!(cs.connector(3).is_none());
    }

    #[test]
    fn scope_is_site_of_site_area() {
        let mut cs = station();
        assert_eq!(cs.scope_id(), Some("site-1"));
        cs.site_area = None;
        assert_eq!(cs.scope_id(), None);
    }
}
