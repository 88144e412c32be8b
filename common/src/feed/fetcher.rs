use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info};

use super::{Clock, FeedCache, FeedSource, parse_feed};
use crate::error::FeedError;
use crate::model::earthquake::EarthquakeRecord;

/// Serves the earthquake feed, going to the network at most once per cache
/// window.
///
/// Methods take `&self` so the fetcher can be shared (`Rc`) between
/// overlapping refresh passes on the UI thread; the cache borrow is never
/// held across an `.await`.
pub struct DataFetcher<S, C> {
    source: S,
    clock: C,
    ttl_ms: u64,
    cache: RefCell<FeedCache>,
}

impl<S: FeedSource, C: Clock> DataFetcher<S, C> {
    pub fn new(source: S, clock: C, ttl_ms: u64) -> Self {
        Self {
            source,
            clock,
            ttl_ms,
            cache: RefCell::new(FeedCache::default()),
        }
    }

    /// Returns the current record list.
    ///
    /// - Within `ttl_ms` of the last successful fetch: the cached list, no I/O.
    /// - Otherwise: exactly one download attempt. On success the list and the
    ///   time this call started are cached. On failure the error is logged
    ///   and an empty list is returned; the next call tries again.
    pub async fn get_earthquake_data(&self) -> Rc<[EarthquakeRecord]> {
        self.current_feed()
            .await
            .unwrap_or_else(|_| Rc::from(Vec::new()))
    }

    /// Like [`get_earthquake_data`](Self::get_earthquake_data), but keeps a
    /// failed download distinguishable from a feed that is really empty.
    pub async fn current_feed(&self) -> Result<Rc<[EarthquakeRecord]>, FeedError> {
        let now = self.clock.now_ms();

        if let Some(records) = self.cache.borrow().fresh(now, self.ttl_ms) {
            debug!("Serving {} cached earthquake records", records.len());
            return Ok(records);
        }

        match self.download().await {
            Ok(records) => {
                let records: Rc<[EarthquakeRecord]> = Rc::from(records);
                info!("Fetched {} earthquake records", records.len());
                self.cache.borrow_mut().store(Rc::clone(&records), now);
                Ok(records)
            }
            Err(err) => {
                error!("Error fetching earthquake data: {}", err);
                self.cache.borrow_mut().mark_failed();
                Err(err)
            }
        }
    }

    async fn download(&self) -> Result<Vec<EarthquakeRecord>, FeedError> {
        let body = self.source.fetch_feed().await?;
        parse_feed(&body)
    }
}
