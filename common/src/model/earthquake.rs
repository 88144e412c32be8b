use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One row of the USGS CSV feed.
///
/// Only the columns the viewer displays are mapped; the feed carries a few
/// more (`gap`, `dmin`, `status`, ...) which are ignored. Every field is
/// optional: an empty cell becomes `None`, and so does a cell that does not
/// parse as the field's type (e.g. `latitude = "n/a"`), which mirrors the
/// dynamic typing a spreadsheet-style parser would apply.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    /// Depth in kilometres.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub depth: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub mag: Option<f64>,
    #[serde(default)]
    pub mag_type: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub net: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub nst: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rms: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub horizontal_error: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub depth_error: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub mag_error: Option<f64>,
    #[serde(default)]
    pub mag_source: Option<String>,
    #[serde(default)]
    pub location_source: Option<String>,
}

impl EarthquakeRecord {
    /// Returns `(latitude, longitude)` when both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// Identity used to de-duplicate markers: the feed identifier, or, for
    /// the rare row that has none, its coordinates plus origin time so that
    /// separate events at the same point keep separate markers.
    pub fn marker_key(&self) -> Option<String> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => self.coordinates().map(|(lat, lon)| match self.time {
                Some(time) => format!("{},{},{}", lat, lon, time.timestamp_millis()),
                None => format!("{},{}", lat, lon),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_require_both_axes() {
        let mut record = EarthquakeRecord {
            latitude: Some(35.0),
            ..Default::default()
        };
        assert_eq!(record.coordinates(), None);

        record.longitude = Some(139.0);
        assert_eq!(record.coordinates(), Some((35.0, 139.0)));

        record.longitude = Some(f64::NAN);
        assert_eq!(record.coordinates(), None);
    }

    #[test]
    fn marker_key_prefers_identifier() {
        let record = EarthquakeRecord {
            id: Some("us7000abcd".to_string()),
            latitude: Some(1.5),
            longitude: Some(-2.0),
            ..Default::default()
        };
        assert_eq!(record.marker_key().as_deref(), Some("us7000abcd"));

        let anonymous = EarthquakeRecord {
            id: Some(String::new()),
            ..record
        };
        assert_eq!(anonymous.marker_key().as_deref(), Some("1.5,-2"));
    }

    #[test]
    fn anonymous_events_at_one_point_get_distinct_keys() {
        let first = EarthquakeRecord {
            time: "2024-05-01T12:00:00Z".parse().ok(),
            latitude: Some(35.0),
            longitude: Some(139.0),
            ..Default::default()
        };
        let second = EarthquakeRecord {
            time: "2024-05-01T12:30:00Z".parse().ok(),
            ..first.clone()
        };

        assert_eq!(first.marker_key().as_deref(), Some("35,139,1714564800000"));
        assert_ne!(first.marker_key(), second.marker_key());
    }
}
