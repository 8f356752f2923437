use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use super::{RemarksMap, RemarksStore};

/// Maximum age of a memoized remarks map.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(30);

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
struct Memo {
    remarks: Arc<RemarksMap>,
    created: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    memo: Option<Memo>,

    /// Bumped on every invalidation. A load only gets memoized if no
    /// invalidation happened while it was in flight.
    generation: u64,
}

/// Time-windowed memo of the whole remarks table, shared by all requests.
#[derive(Debug)]
pub struct RemarksCache {
    inner: Mutex<Inner>,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RemarksCache {
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, Arc::new(SystemClock))
    }

    pub fn with_clock(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            window,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the memoized map if it is younger than the window, otherwise
    /// reload it from `store`. Store failures yield an empty map which is not
    /// memoized.
    pub async fn get_all(&self, store: &dyn RemarksStore) -> Arc<RemarksMap> {
        let generation = {
            let inner = self.lock();
            if let Some(memo) = &inner.memo {
                if self.clock.now().duration_since(memo.created) < self.window {
                    return memo.remarks.clone();
                }
            }
            inner.generation
        };

        let remarks = match store.get_all().await {
            Ok(remarks) => Arc::new(remarks),
            Err(e) => {
                warn!("Unable to read remarks, continuing without them: {e}");
                return Arc::new(RemarksMap::new());
            }
        };

        let mut inner = self.lock();
        if inner.generation == generation {
            debug!("Cached {} remarks", remarks.len());
            inner.memo = Some(Memo {
                remarks: remarks.clone(),
                created: self.clock.now(),
            });
        }

        remarks
    }

    pub fn invalidate(&self) {
        let mut inner = self.lock();
        inner.memo = None;
        inner.generation += 1;
    }
}
