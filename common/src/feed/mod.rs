//! Retrieval, parsing and time-boxed caching of the earthquake feed.
//!
//! The network and the wall clock are reached through the [`FeedSource`] and
//! [`Clock`] traits so the caching policy can be exercised without a browser.

use std::future::Future;

use csv::{ReaderBuilder, Trim};

use crate::error::FeedError;
use crate::model::earthquake::EarthquakeRecord;

mod cache;
mod fetcher;

pub use cache::FeedCache;
pub use fetcher::DataFetcher;

/// Something that can download the raw feed body.
pub trait FeedSource {
    fn fetch_feed(&self) -> impl Future<Output = Result<String, FeedError>>;
}

/// Milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Parses the CSV body into records, in feed order.
///
/// The first line is the header; blank lines are skipped. A row whose field
/// count does not match the header fails the whole parse, while a single
/// unparseable typed value only clears that field.
pub fn parse_feed(body: &str) -> Result<Vec<EarthquakeRecord>, FeedError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
