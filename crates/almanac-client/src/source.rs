//! Record sources and the cached wrapper the site reads through.

use std::sync::Arc;
use std::time::Duration;

use almanac_core::{Cache, RawRecord};
use async_trait::async_trait;

use crate::FeishuClient;

/// Cache slot holding the fetched record list.
pub const RECORDS_CACHE_KEY: &str = "feishu_data";

/// How long a fetched record list is served before refetching.
pub const RECORDS_TTL: Duration = Duration::from_secs(3600);

/// Anything that can produce the current list of records.
///
/// Failures are absorbed by the implementation; an unavailable source
/// yields an empty list.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// The current records, in source order.
    async fn records(&self) -> Vec<RawRecord>;
}

#[async_trait]
impl RecordSource for FeishuClient {
    async fn records(&self) -> Vec<RawRecord> {
        self.fetch_records().await
    }
}

#[async_trait]
impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    async fn records(&self) -> Vec<RawRecord> {
        (**self).records().await
    }
}

/// A [`RecordSource`] served from a single cache slot.
///
/// A miss runs one upstream fetch and stores whatever it returned, empty
/// lists included. Concurrent misses are not coalesced; each may fetch.
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<dyn Cache<Vec<RawRecord>>>,
    ttl: Duration,
}

impl<S: RecordSource> CachedSource<S> {
    /// Wrap `inner` with `cache`, using [`RECORDS_TTL`].
    pub fn new(inner: S, cache: Arc<dyn Cache<Vec<RawRecord>>>) -> Self {
        Self {
            inner,
            cache,
            ttl: RECORDS_TTL,
        }
    }

    /// Override the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The TTL applied to fetched records.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl<S: RecordSource> RecordSource for CachedSource<S> {
    async fn records(&self) -> Vec<RawRecord> {
        if let Some(records) = self.cache.get(RECORDS_CACHE_KEY) {
            tracing::debug!(count = records.len(), "Record cache hit");
            return records;
        }

        tracing::debug!("Record cache miss, fetching upstream");
        let records = self.inner.records().await;
        self.cache.set(RECORDS_CACHE_KEY, records.clone(), self.ttl);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_core::{ManualClock, MemoryCache};
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that counts calls and returns a fixed list.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        records: Vec<RawRecord>,
    }

    #[async_trait]
    impl RecordSource for CountingSource {
        async fn records(&self) -> Vec<RawRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.clone()
        }
    }

    fn setup(
        records: Vec<RawRecord>,
    ) -> (Arc<AtomicUsize>, Arc<ManualClock>, CachedSource<CountingSource>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let clock = Arc::new(ManualClock::new());
        let cache: Arc<dyn Cache<Vec<RawRecord>>> =
            Arc::new(MemoryCache::<Vec<RawRecord>>::with_clock(clock.clone()));
        let source = CachedSource::new(
            CountingSource {
                calls: calls.clone(),
                records,
            },
            cache,
        );
        (calls, clock, source)
    }

    fn one_record() -> Vec<RawRecord> {
        vec![RawRecord::new("rec1", Map::new())]
    }

    #[tokio::test]
    async fn test_second_read_within_ttl_is_cached() {
        let (calls, _, source) = setup(one_record());

        assert_eq!(source.records().await, one_record());
        assert_eq!(source.records().await, one_record());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetch_after_ttl() {
        let (calls, clock, source) = setup(one_record());

        source.records().await;
        clock.advance(RECORDS_TTL);
        source.records().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached() {
        let (calls, _, source) = setup(Vec::new());

        assert!(source.records().await.is_empty());
        assert!(source.records().await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let (calls, clock, source) = setup(one_record());
        let source = source.with_ttl(Duration::from_secs(60));
        assert_eq!(source.ttl(), Duration::from_secs(60));

        source.records().await;
        clock.advance(Duration::from_secs(61));
        source.records().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_arc_source_delegates() {
        let (calls, _, source) = setup(one_record());
        let shared: Arc<dyn RecordSource> = Arc::new(source);
        assert_eq!(shared.records().await.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
