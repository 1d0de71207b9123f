//! DTOs exchanged with downstream services.
//!
//! # Design
//! These types mirror the downstream stub's schema but are defined
//! independently of it; integration tests catch any drift between the two.

use serde::{Deserialize, Serialize};

/// Shape of a structured error body returned by a downstream service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// An aircraft record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: u64,
    pub model: String,
}

/// Payload for registering or updating an aircraft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAircraft {
    pub model: String,
}

/// An airport record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub id: u64,
    pub name: String,
}

/// Payload for registering or renaming an airport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAirport {
    pub name: String,
}
