//! Flattens the date-grouped NeoWs feed into display-ready meteor events.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::NeoFeed;

/// Format of the feed's `close_approach_date_full` field.
const APPROACH_DATE_FORMAT: &str = "%Y-%b-%d %H:%M";

/// A simplified close-approach event derived from one [`NearEarthObject`],
/// immutable once produced.
///
/// [`NearEarthObject`]: crate::models::NearEarthObject
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeteorEvent {
    pub id: String,
    pub name: String,
    /// Full-precision approach timestamp, verbatim from the feed.
    pub approach_date: String,
    pub estimated_size: SizeRange,
    pub velocity: Measurement,
    pub distance: Measurement,
    pub is_hazardous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: &'static str,
}

impl MeteorEvent {
    /// Parses the approach timestamp, or `None` when the feed sends a shape
    /// this code does not recognize.
    pub fn approach_timestamp(&self) -> Option<NaiveDateTime> {
        parse_approach_date(&self.approach_date)
    }
}

pub fn parse_approach_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, APPROACH_DATE_FORMAT).ok()
}

/// Malformed numeric strings become `NaN` rather than dropping the record --
/// preserved behavior, pending a decision from the feed owners.
fn parse_metric(raw: &str) -> f64 {
    raw.parse().unwrap_or(f64::NAN)
}

/// Flattens a feed into a chronologically sorted list of events.
///
/// For every object under every date key, the first close-approach record
/// is consulted (the service orders them soonest-first); objects with no
/// approach records are silently dropped. The result is stable-sorted
/// ascending by parsed approach timestamp, so objects sharing a timestamp
/// keep their feed order. Never fails: the worst cases are an empty output
/// or `NaN` numeric fields.
pub fn to_events(feed: &NeoFeed) -> Vec<MeteorEvent> {
    let mut events: Vec<MeteorEvent> = Vec::new();

    for objects in feed.near_earth_objects.values() {
        for neo in objects {
            let Some(approach) = neo.close_approach_data.first() else {
                continue;
            };

            let km = neo.estimated_diameter.kilometers;
            events.push(MeteorEvent {
                id: neo.id.clone(),
                name: neo.name.clone(),
                approach_date: approach.close_approach_date_full.clone(),
                estimated_size: SizeRange {
                    min: km.estimated_diameter_min,
                    max: km.estimated_diameter_max,
                    unit: "km",
                },
                velocity: Measurement {
                    value: parse_metric(&approach.relative_velocity.kilometers_per_hour),
                    unit: "km/h",
                },
                distance: Measurement {
                    value: parse_metric(&approach.miss_distance.kilometers),
                    unit: "km",
                },
                is_hazardous: neo.is_potentially_hazardous_asteroid,
            });
        }
    }

    // sort_by_key is stable; unparseable timestamps (None) sort first
    events.sort_by_key(MeteorEvent::approach_timestamp);
    events
}
