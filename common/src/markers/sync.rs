use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use log::debug;

use super::{MarkerLayer, MarkerSpec, Pacer};
use crate::feed::{Clock, DataFetcher, FeedSource};
use crate::model::earthquake::EarthquakeRecord;

struct ActiveMarker<H> {
    handle: H,
    latitude: f64,
    longitude: f64,
    updated: Option<DateTime<Utc>>,
}

/// Generation number taken when a refresh pass starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassOutcome {
    #[default]
    Completed,
    /// A newer pass started while this one was suspended; it stopped early.
    Superseded,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub outcome: PassOutcome,
    pub added: usize,
    pub replaced: usize,
    /// Markers removed because their record left the feed.
    pub removed: usize,
    pub skipped_without_coordinates: usize,
}

/// Keeps one marker per in-view record on a [`MarkerLayer`].
///
/// The active-marker collection is keyed by record identifier, so running a
/// pass over an unchanged view never duplicates a marker. A marker is removed
/// by [`prune`](Self::prune) once it is out of view, by a pass whose freshly
/// loaded feed no longer lists its record, or when its record's `updated`
/// time changes and the marker is redrawn. A failed download removes nothing.
///
/// Passes are numbered. [`begin_pass`](Self::begin_pass) is synchronous so
/// the caller can invalidate older passes at the moment the view changes;
/// an older pass notices at its next suspension point and returns
/// [`PassOutcome::Superseded`].
pub struct MarkerSynchronizer<L: MarkerLayer, P> {
    layer: L,
    pacer: P,
    pacing_ms: u32,
    event_page_base: String,
    active: RefCell<HashMap<String, ActiveMarker<L::Handle>>>,
    generation: Cell<u64>,
}

impl<L: MarkerLayer, P: Pacer> MarkerSynchronizer<L, P> {
    pub fn new(layer: L, pacer: P, pacing_ms: u32, event_page_base: impl Into<String>) -> Self {
        Self {
            layer,
            pacer,
            pacing_ms,
            event_page_base: event_page_base.into(),
            active: RefCell::new(HashMap::new()),
            generation: Cell::new(0),
        }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    #[cfg(test)]
    fn is_active(&self, key: &str) -> bool {
        self.active.borrow().contains_key(key)
    }

    /// Removes every marker whose point is outside the current view.
    /// Returns how many were removed.
    pub fn prune(&self) -> usize {
        let bounds = self.layer.visible_bounds();
        let mut active = self.active.borrow_mut();
        let before = active.len();
        active.retain(|_, marker| {
            if bounds.contains(marker.latitude, marker.longitude) {
                true
            } else {
                self.layer.remove_marker(&marker.handle);
                false
            }
        });
        before - active.len()
    }

    /// Starts a new pass generation, superseding any pass still running.
    pub fn begin_pass(&self) -> PassToken {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        PassToken(next)
    }

    fn is_current(&self, token: PassToken) -> bool {
        self.generation.get() == token.0
    }

    /// Initial-load entry point: a fresh pass without pruning.
    pub async fn refresh<S: FeedSource, C: Clock>(&self, fetcher: &DataFetcher<S, C>) -> PassReport {
        let token = self.begin_pass();
        self.run_pass(token, fetcher).await
    }

    /// View-change entry point: prune first, then a fresh pass.
    pub async fn view_settled<S: FeedSource, C: Clock>(
        &self,
        fetcher: &DataFetcher<S, C>,
    ) -> PassReport {
        let removed = self.prune();
        debug!("Pruned {} markers outside the view", removed);
        self.refresh(fetcher).await
    }

    /// Drops markers whose record is absent from `records`. Returns how many
    /// were removed.
    fn retire_missing(&self, records: &[EarthquakeRecord]) -> usize {
        let listed: HashSet<String> = records.iter().filter_map(|r| r.marker_key()).collect();
        let mut active = self.active.borrow_mut();
        let before = active.len();
        active.retain(|key, marker| {
            if listed.contains(key) {
                true
            } else {
                self.layer.remove_marker(&marker.handle);
                false
            }
        });
        before - active.len()
    }

    /// Adds a marker for every in-view record that does not have one yet.
    ///
    /// When the feed loads, markers for records it no longer lists are
    /// removed first. Records are then visited in feed order and the view is
    /// re-read for each one. Successive insertions are separated by a
    /// `pacing_ms` pause.
    pub async fn run_pass<S: FeedSource, C: Clock>(
        &self,
        token: PassToken,
        fetcher: &DataFetcher<S, C>,
    ) -> PassReport {
        let mut report = PassReport::default();

        let loaded = fetcher.current_feed().await;
        if !self.is_current(token) {
            report.outcome = PassOutcome::Superseded;
            return report;
        }

        let records = match loaded {
            Ok(records) => {
                report.removed = self.retire_missing(&records);
                records
            }
            Err(_) => return report,
        };

        let mut inserted_any = false;
        for record in records.iter() {
            let Some(spec) = MarkerSpec::for_record(record, &self.event_page_base) else {
                report.skipped_without_coordinates += 1;
                continue;
            };

            if !self
                .layer
                .visible_bounds()
                .contains(spec.latitude, spec.longitude)
            {
                continue;
            }

            let replacing = match self.active.borrow().get(&spec.key) {
                Some(existing) if existing.updated == record.updated => continue,
                Some(_) => true,
                None => false,
            };

            if inserted_any {
                self.pacer.pause(self.pacing_ms).await;
                if !self.is_current(token) {
                    report.outcome = PassOutcome::Superseded;
                    break;
                }
                // The view may have moved while paused.
                if !self
                    .layer
                    .visible_bounds()
                    .contains(spec.latitude, spec.longitude)
                {
                    continue;
                }
            }

            let handle = self.layer.add_marker(&spec);
            let previous = self.active.borrow_mut().insert(
                spec.key,
                ActiveMarker {
                    handle,
                    latitude: spec.latitude,
                    longitude: spec.longitude,
                    updated: record.updated,
                },
            );
            if let Some(previous) = previous {
                self.layer.remove_marker(&previous.handle);
            }

            if replacing {
                report.replaced += 1;
            } else {
                report.added += 1;
            }
            inserted_any = true;
        }

        debug!(
            "Marker pass finished: {:?}, {} added, {} replaced, {} removed, {} active",
            report.outcome,
            report.added,
            report.replaced,
            report.removed,
            self.active_count()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::feed::tests::HEADER;
    use crate::model::bounds::GeoBounds;
    use crate::model::magnitude::MagnitudeBucket;
    use std::collections::BTreeMap;
    use std::time::Duration;

    struct FakeMap {
        bounds: Cell<GeoBounds>,
        next_handle: Cell<usize>,
        placed: RefCell<BTreeMap<usize, MarkerSpec>>,
        events: RefCell<Vec<String>>,
    }

    impl FakeMap {
        fn new(bounds: GeoBounds) -> Self {
            Self {
                bounds: Cell::new(bounds),
                next_handle: Cell::new(0),
                placed: RefCell::new(BTreeMap::new()),
                events: RefCell::new(Vec::new()),
            }
        }

        fn placed_keys(&self) -> Vec<String> {
            let mut keys: Vec<_> = self.placed.borrow().values().map(|m| m.key.clone()).collect();
            keys.sort();
            keys
        }
    }

    impl MarkerLayer for &FakeMap {
        type Handle = usize;

        fn visible_bounds(&self) -> GeoBounds {
            self.bounds.get()
        }

        fn add_marker(&self, marker: &MarkerSpec) -> usize {
            let handle = self.next_handle.get();
            self.next_handle.set(handle + 1);
            self.placed.borrow_mut().insert(handle, marker.clone());
            self.events.borrow_mut().push(format!("add:{}", marker.key));
            handle
        }

        fn remove_marker(&self, handle: &usize) {
            if let Some(marker) = self.placed.borrow_mut().remove(handle) {
                self.events.borrow_mut().push(format!("remove:{}", marker.key));
            }
        }
    }

    struct NoPause;

    impl Pacer for NoPause {
        async fn pause(&self, _ms: u32) {}
    }

    struct TokioPause;

    impl Pacer for TokioPause {
        async fn pause(&self, ms: u32) {
            tokio::time::sleep(Duration::from_millis(u64::from(ms))).await;
        }
    }

    struct Bodies {
        bodies: RefCell<Vec<String>>,
        calls: Cell<usize>,
    }

    impl Bodies {
        fn new(bodies: Vec<String>) -> Self {
            Self {
                bodies: RefCell::new(bodies),
                calls: Cell::new(0),
            }
        }
    }

    impl FeedSource for &Bodies {
        async fn fetch_feed(&self) -> Result<String, FeedError> {
            self.calls.set(self.calls.get() + 1);
            let mut bodies = self.bodies.borrow_mut();
            if bodies.is_empty() {
                return Err(FeedError::Network("exhausted".into()));
            }
            Ok(bodies.remove(0))
        }
    }

    struct SettableClock(Cell<u64>);

    impl Clock for &SettableClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    fn row(id: &str, lat: f64, lon: f64, mag: f64, updated: &str) -> String {
        format!(
            "2024-05-01T12:00:00.000Z,{lat},{lon},10,{mag},ml,,,,,us,{id},{updated},,earthquake,,,,,,,"
        )
    }

    fn body(rows: &[String]) -> String {
        let mut body = format!("{HEADER}\n");
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        body
    }

    const T1: &str = "2024-05-01T12:10:00.000Z";
    const T2: &str = "2024-05-01T13:45:00.000Z";

    fn japan() -> GeoBounds {
        GeoBounds::new(125.0, 25.0, 150.0, 45.0)
    }

    #[tokio::test]
    async fn single_record_in_view_gets_one_marker() {
        let source = Bodies::new(vec![body(&[row("ev1", 35.0, 139.0, 5.2, T1)])]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(
            &map,
            NoPause,
            10,
            "https://earthquake.usgs.gov/earthquakes/eventpage/",
        );

        let report = sync.refresh(&fetcher).await;

        assert_eq!(report.outcome, PassOutcome::Completed);
        assert_eq!(report.added, 1);
        let placed = map.placed.borrow();
        assert_eq!(placed.len(), 1);
        let marker = placed.values().next().unwrap();
        assert_eq!((marker.latitude, marker.longitude), (35.0, 139.0));
        assert_eq!(marker.color, MagnitudeBucket::Moderate.color());
        assert!(marker.popup_html.contains("ev1"));
        assert!(marker
            .popup_html
            .contains("https://earthquake.usgs.gov/earthquakes/eventpage/ev1"));
    }

    #[tokio::test]
    async fn only_in_view_records_are_drawn() {
        let source = Bodies::new(vec![body(&[
            row("tokyo", 35.7, 139.7, 4.1, T1),
            row("lima", -12.0, -77.0, 6.3, T1),
            row("osaka", 34.7, 135.5, 3.3, T1),
            "2024-05-01T12:00:00.000Z,,139.0,10,2.0,ml,,,,,us,nolat,,,earthquake,,,,,,,".to_string(),
        ])]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, NoPause, 10, "");

        let report = sync.refresh(&fetcher).await;

        assert_eq!(map.placed_keys(), vec!["osaka", "tokyo"]);
        assert_eq!(report.added, 2);
        assert_eq!(report.skipped_without_coordinates, 1);
        assert!(sync.is_active("tokyo"));
        assert!(!sync.is_active("lima"));
    }

    #[tokio::test]
    async fn repeated_passes_do_not_duplicate_markers() {
        let source = Bodies::new(vec![body(&[
            row("a", 30.0, 130.0, 4.0, T1),
            row("b", 31.0, 131.0, 4.0, T1),
        ])]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, NoPause, 10, "");

        sync.refresh(&fetcher).await;
        let second = sync.view_settled(&fetcher).await;
        let third = sync.view_settled(&fetcher).await;

        assert_eq!(second.added, 0);
        assert_eq!(third.added, 0);
        assert_eq!(map.placed.borrow().len(), 2);
        assert_eq!(sync.active_count(), 2);
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn view_change_prunes_before_adding() {
        let source = Bodies::new(vec![body(&[
            row("west", 35.0, 126.0, 4.0, T1),
            row("middle", 35.0, 140.0, 4.0, T1),
            row("east", 35.0, 160.0, 4.0, T1),
        ])]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, NoPause, 10, "");

        sync.refresh(&fetcher).await;
        assert_eq!(map.placed_keys(), vec!["middle", "west"]);

        map.bounds.set(GeoBounds::new(135.0, 25.0, 165.0, 45.0));
        map.events.borrow_mut().clear();
        sync.view_settled(&fetcher).await;

        assert_eq!(*map.events.borrow(), vec!["remove:west", "add:east"]);
        assert_eq!(map.placed_keys(), vec!["east", "middle"]);
    }

    #[tokio::test]
    async fn updated_record_replaces_its_marker() {
        let source = Bodies::new(vec![
            body(&[row("ev9", 35.0, 139.0, 4.4, T1)]),
            body(&[row("ev9", 35.0, 139.0, 4.9, T2)]),
        ]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, NoPause, 10, "");

        sync.refresh(&fetcher).await;
        clock.0.set(61_000);
        let report = sync.view_settled(&fetcher).await;

        assert_eq!(report.replaced, 1);
        assert_eq!(report.added, 0);
        let placed = map.placed.borrow();
        assert_eq!(placed.len(), 1);
        assert!(placed.values().next().unwrap().popup_html.contains("4.9"));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_existing_markers() {
        let source = Bodies::new(vec![body(&[row("a", 30.0, 130.0, 4.0, T1)])]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, NoPause, 10, "");

        sync.refresh(&fetcher).await;
        clock.0.set(120_000);
        let report = sync.view_settled(&fetcher).await;

        assert_eq!(report, PassReport::default());
        assert_eq!(map.placed_keys(), vec!["a"]);
        assert_eq!(source.calls.get(), 2);
    }

    #[tokio::test]
    async fn record_dropped_from_feed_loses_its_marker() {
        let source = Bodies::new(vec![
            body(&[row("old", 30.0, 130.0, 4.0, T1), row("kept", 31.0, 131.0, 4.0, T1)]),
            body(&[row("kept", 31.0, 131.0, 4.0, T1), row("new", 32.0, 132.0, 4.0, T1)]),
        ]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, NoPause, 10, "");

        sync.refresh(&fetcher).await;
        clock.0.set(60_000);
        let report = sync.view_settled(&fetcher).await;

        assert_eq!(report.removed, 1);
        assert_eq!(report.added, 1);
        assert!(!sync.is_active("old"));
        assert_eq!(map.placed_keys(), vec!["kept", "new"]);
    }

    #[tokio::test]
    async fn anonymous_events_at_one_point_each_get_a_marker() {
        let source = Bodies::new(vec![body(&[
            "2024-05-01T12:00:00.000Z,35,139,10,4.0,ml,,,,,us,,2024-05-01T12:05:00.000Z,,earthquake,,,,,,,".to_string(),
            "2024-05-01T12:30:00.000Z,35,139,10,4.6,ml,,,,,us,,2024-05-01T12:35:00.000Z,,earthquake,,,,,,,".to_string(),
        ])]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, NoPause, 10, "");

        let report = sync.refresh(&fetcher).await;

        assert_eq!(report.added, 2);
        assert_eq!(report.replaced, 0);
        assert_eq!(map.placed.borrow().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn insertions_are_paced() {
        let source = Bodies::new(vec![body(&[
            row("a", 30.0, 130.0, 4.0, T1),
            row("b", 31.0, 131.0, 4.0, T1),
            row("c", 32.0, 132.0, 4.0, T1),
        ])]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, TokioPause, 10, "");

        let started = tokio::time::Instant::now();
        sync.refresh(&fetcher).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(30));
        assert_eq!(map.placed.borrow().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_pass_supersedes_older_one() {
        let rows: Vec<String> = (0..5u32)
            .map(|i| row(&format!("q{i}"), 30.0 + f64::from(i), 130.0, 4.0, T1))
            .collect();
        let source = Bodies::new(vec![body(&rows)]);
        let clock = SettableClock(Cell::new(0));
        let fetcher = DataFetcher::new(&source, &clock, 60_000);
        let map = FakeMap::new(japan());
        let sync = MarkerSynchronizer::new(&map, TokioPause, 10, "");

        let (first, second) = tokio::join!(sync.refresh(&fetcher), async {
            tokio::time::sleep(Duration::from_millis(15)).await;
            sync.view_settled(&fetcher).await
        });

        assert_eq!(first.outcome, PassOutcome::Superseded);
        assert_eq!(first.added, 2);
        assert_eq!(second.outcome, PassOutcome::Completed);
        assert_eq!(second.added, 3);
        assert_eq!(map.placed.borrow().len(), 5);
        assert_eq!(sync.active_count(), 5);
        assert_eq!(source.calls.get(), 1);
    }
}
