use std::rc::Rc;

use crate::model::earthquake::EarthquakeRecord;

/// Last fetched feed plus the time it was fetched.
///
/// Owned by [`super::DataFetcher`]; nothing else mutates it.
#[derive(Debug, Default)]
pub struct FeedCache {
    records: Option<Rc<[EarthquakeRecord]>>,
    fetched_at_ms: Option<u64>,
}

impl FeedCache {
    /// Cached records, if a fetch succeeded less than `ttl_ms` before `now_ms`.
    pub fn fresh(&self, now_ms: u64, ttl_ms: u64) -> Option<Rc<[EarthquakeRecord]>> {
        match (&self.records, self.fetched_at_ms) {
            (Some(records), Some(at)) if now_ms.saturating_sub(at) < ttl_ms => {
                Some(Rc::clone(records))
            }
            _ => None,
        }
    }

    pub fn store(&mut self, records: Rc<[EarthquakeRecord]>, fetched_at_ms: u64) {
        self.records = Some(records);
        self.fetched_at_ms = Some(fetched_at_ms);
    }

    /// Drops the cached records after a failed refresh. The timestamp is left
    /// alone so the next access is already outside the window and retries.
    pub fn mark_failed(&mut self) {
        self.records = Some(Rc::from(Vec::new()));
    }

    #[cfg(test)]
    fn fetched_at_ms(&self) -> Option<u64> {
        self.fetched_at_ms
    }
}
