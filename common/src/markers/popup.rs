//! HTML for the per-event detail popup.
//!
//! The popup is a static summary: one labelled line per feed field, with a
//! literal placeholder for anything the feed left empty. Feed text is
//! escaped before it is embedded, since the map library inserts the string
//! with `innerHTML`.

use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::model::earthquake::EarthquakeRecord;

const NOT_AVAILABLE: &str = "Not Available";
const UNKNOWN: &str = "Unknown";

/// Escapes `&`, `<`, `>`, `"` and `'` for safe inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `dd/mm/yyyy, HH:MM:SS UTC`, 24-hour clock.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y, %H:%M:%S UTC").to_string()
}

fn or_placeholder<T: Display>(value: Option<T>, placeholder: &str) -> String {
    match value {
        Some(v) => escape_html(&v.to_string()),
        None => placeholder.to_string(),
    }
}

fn text_or(value: &Option<String>, placeholder: &str) -> String {
    or_placeholder(value.as_deref().filter(|s| !s.is_empty()), placeholder)
}

pub fn render_popup(
    record: &EarthquakeRecord,
    latitude: f64,
    longitude: f64,
    event_page_base: &str,
) -> String {
    let occurred = or_placeholder(record.time.as_ref().map(format_timestamp), UNKNOWN);
    let updated = or_placeholder(record.updated.as_ref().map(format_timestamp), UNKNOWN);

    let mut html = format!(
        "<h3>Earthquake Details</h3>\n\
         <strong>Location:</strong> {place} <br>\n\
         <strong>Lat/Lon:</strong> {latitude}, {longitude}<br>\n\
         <strong>Occurred:</strong> {occurred} <br>\n\
         <strong>Magnitude:</strong> {mag} ({mag_type} scale) <br>\n\
         <strong>Depth:</strong> {depth} km <br>\n\
         <strong>Horizontal Error:</strong> {horizontal_error} km <br>\n\
         <strong>Depth Error:</strong> {depth_error} km <br>\n\
         <strong>Magnitude Error:</strong> {mag_error} <br>\n\
         <strong>Magnitude Source:</strong> {mag_source} <br>\n\
         <strong>Location Source:</strong> {location_source} <br>\n\
         <strong>Updated:</strong> {updated} <br>\n\
         <strong>Event Type:</strong> {event_type} <br>\n\
         <strong>Network:</strong> {net} <br>\n\
         <strong>ID:</strong> {id} <br>\n\
         <strong>Number of Stations Reporting:</strong> {nst} <br>\n\
         <strong>RMS Value (Quality of Data):</strong> {rms} <br>\n",
        place = text_or(&record.place, UNKNOWN),
        mag = or_placeholder(record.mag, UNKNOWN),
        mag_type = text_or(&record.mag_type, UNKNOWN),
        depth = or_placeholder(record.depth, UNKNOWN),
        horizontal_error = or_placeholder(record.horizontal_error, NOT_AVAILABLE),
        depth_error = or_placeholder(record.depth_error, NOT_AVAILABLE),
        mag_error = or_placeholder(record.mag_error, NOT_AVAILABLE),
        mag_source = text_or(&record.mag_source, NOT_AVAILABLE),
        location_source = text_or(&record.location_source, NOT_AVAILABLE),
        event_type = text_or(&record.event_type, UNKNOWN),
        net = text_or(&record.net, NOT_AVAILABLE),
        id = text_or(&record.id, UNKNOWN),
        nst = or_placeholder(record.nst, UNKNOWN),
        rms = or_placeholder(record.rms, NOT_AVAILABLE),
    );

    if let Some(id) = record.id.as_deref().filter(|id| !id.is_empty()) {
        html.push_str(&format!(
            "<strong><a href=\"{}{}\" target=\"_blank\">USGS event page</a></strong>\n",
            escape_html(event_page_base),
            escape_html(id)
        ));
    }

    html
}
