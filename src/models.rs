//! Serde mirror of the NASA NeoWs and APOD response schemas.
//!
//! These are the wire shapes exactly as the service returns them; nothing
//! here is derived or display-oriented. Velocity and distance arrive as
//! string-encoded numbers, which is the documented NeoWs behavior, so they
//! stay strings until [`crate::events::to_events`] parses them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One page of the `/neo/rest/v1/feed` endpoint: objects grouped by the
/// `YYYY-MM-DD` date of their approach.
///
/// The grouping is a `BTreeMap` so iteration order is deterministic. The
/// service emits keys in date order anyway; the map makes that a guarantee
/// rather than an accident of JSON parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoFeed {
    #[serde(default)]
    pub element_count: u64,
    pub near_earth_objects: BTreeMap<String, Vec<NearEarthObject>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearEarthObject {
    pub id: String,
    pub name: String,
    pub estimated_diameter: EstimatedDiameter,
    pub is_potentially_hazardous_asteroid: bool,
    /// Ordered soonest-first by the service; only the first entry is
    /// consulted downstream (documented API contract, not checked here).
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    pub kilometers: DiameterRange,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseApproach {
    /// Full-precision timestamp, e.g. `"2024-Jan-01 12:00"`.
    pub close_approach_date_full: String,
    pub relative_velocity: RelativeVelocity,
    pub miss_distance: MissDistance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeVelocity {
    /// String-encoded number, km/h.
    pub kilometers_per_hour: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissDistance {
    /// String-encoded number, km.
    pub kilometers: String,
}

/// Astronomy Picture of the Day, from `/planetary/apod`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apod {
    pub title: String,
    pub explanation: String,
    /// `"image"` or `"video"`; only images are rendered.
    pub media_type: String,
    pub url: String,
    #[serde(default)]
    pub copyright: Option<String>,
}
