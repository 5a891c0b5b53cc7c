use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

type Flight<T> = Shared<BoxFuture<'static, T>>;

/// Single-flight coordinator: at most one concurrent execution of the
/// work per key, with every concurrent caller sharing the same outcome.
///
/// The in-flight map holds only weak handles, so the work is driven by
/// its callers: when the last joined caller drops its future, the work
/// itself is dropped, which gives reference-counted cancellation. A completed or
/// abandoned flight never poisons the key; the next call starts fresh.
pub struct SingleFlight<T: Clone> {
    inflight: Arc<Mutex<HashMap<String, WeakShared<BoxFuture<'static, T>>>>>,
}

// Derived Clone would require T: Clone on the bound anyway; hand-rolled to
// make clear that clones share the same in-flight map.
impl<T: Clone> Clone for SingleFlight<T> {
    fn clone(&self) -> Self {
        Self {
            inflight: Arc::clone(&self.inflight),
        }
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` for `key`, or join the execution already in flight.
    ///
    /// `work` is lazy: a joiner's copy is dropped unpolled, so only the
    /// flight leader ever executes it.
    pub async fn run<F>(&self, key: &str, work: F) -> T
    where
        F: Future<Output = T> + Send + 'static,
    {
        let flight = {
            let mut inflight = self.inflight.lock();
            if let Some(existing) = inflight.get(key).and_then(WeakShared::upgrade) {
                debug!(key, "joining in-flight generation");
                existing
            } else {
                // Leader path: the flight removes its own map entry once
                // it settles, so joiners that already hold the handle
                // still observe the result
                let map = Arc::clone(&self.inflight);
                let owned_key = key.to_string();
                let flight: Flight<T> = async move {
                    let outcome = work.await;
                    map.lock().remove(&owned_key);
                    outcome
                }
                .boxed()
                .shared();

                if let Some(weak) = flight.downgrade() {
                    inflight.insert(key.to_string(), weak);
                }
                flight
            }
        };

        flight.await
    }

    /// Number of live in-flight executions
    pub fn inflight_count(&self) -> usize {
        self.inflight
            .lock()
            .values()
            .filter(|weak| weak.upgrade().is_some())
            .count()
    }
}
