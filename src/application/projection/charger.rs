use super::format::connector_letter;
use super::ViewProjection;
use crate::application::security::Capabilities;
use crate::domain::{ChargingStation, Connector};

/// Display state of the error-report screen header
#[derive(Debug, Clone, PartialEq)]
pub struct ChargerView {
    pub station_id: String,
    pub connector: Option<Connector>,
    pub connector_letter: Option<char>,
    pub is_admin: bool,
    pub is_site_admin: bool,
}

/// Projects a station, focusing on the connector the user came from.
#[derive(Debug, Clone, Default)]
pub struct ChargerProjector {
    connector_id: Option<u32>,
}

impl ChargerProjector {
    pub fn new(connector_id: Option<u32>) -> Self {
        Self { connector_id }
    }
}

impl ViewProjection<ChargingStation> for ChargerProjector {
    type View = ChargerView;

    fn project(&self, station: &ChargingStation, capabilities: &Capabilities) -> ChargerView {
        let connector = self
            .connector_id
            .and_then(|id| station.connector(id))
            .cloned();

        ChargerView {
            station_id: station.id.clone(),
            connector_letter: connector.as_ref().and_then(|c| connector_letter(c.connector_id)),
            connector,
            is_admin: capabilities.is_admin(),
            is_site_admin: capabilities.is_resource_site_admin(),
        }
    }
}
