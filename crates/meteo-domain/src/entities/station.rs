//! Weather stations

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// Operational status of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Active,
    Inactive,
}

/// A physical weather station feeding the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub status: StationStatus,
}

impl Station {
    /// New stations start inactive until explicitly activated.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            status: StationStatus::Inactive,
        }
    }

    pub fn activate(&mut self) {
        self.status = StationStatus::Active;
    }

    pub fn deactivate(&mut self) {
        self.status = StationStatus::Inactive;
    }

    pub fn is_active(&self) -> bool {
        self.status == StationStatus::Active
    }
}
