//! Periodic driver that evaluates registered schedules.
//!
//! The engine holds named entries, each an owner-bound [`ActiveSchedule`]
//! with default parameters and a handler. A background loop samples the
//! clock on a configurable interval (finer than the minute granularity of
//! schedules), evaluates every entry against the current instant, and
//! invokes the handler of each entry whose schedule fires — at most once
//! per calendar minute per entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::params::ParameterMap;
use crate::trigger::ActiveSchedule;
use crate::types::TickInstant;

/// Trait for schedule firing handlers.
#[async_trait]
pub trait FireHandler: Send + Sync {
    /// Handle one firing with the merged parameter values.
    async fn fire(&self, entry: &str, params: ParameterMap);
}

/// Handler that runs a closure.
pub struct ClosureHandler<F>
where
    F: Fn(&str, &ParameterMap) + Send + Sync,
{
    func: F,
}

impl<F> ClosureHandler<F>
where
    F: Fn(&str, &ParameterMap) + Send + Sync,
{
    /// Create a new closure handler.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> FireHandler for ClosureHandler<F>
where
    F: Fn(&str, &ParameterMap) + Send + Sync,
{
    async fn fire(&self, entry: &str, params: ParameterMap) {
        (self.func)(entry, &params)
    }
}

/// An engine event.
#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// An entry was registered.
    Registered { entry: String },
    /// An entry's schedule fired.
    Fired {
        entry: String,
        at: TickInstant,
        params: ParameterMap,
    },
    /// An entry was removed.
    Removed { entry: String },
}

struct TimerEntry {
    schedule: Arc<ActiveSchedule>,
    defaults: ParameterMap,
    handler: Arc<dyn FireHandler>,
    last_fired: Option<TickInstant>,
}

/// Engine that manages and periodically evaluates schedule entries.
pub struct TimerEngine {
    entries: Arc<RwLock<HashMap<String, TimerEntry>>>,
    event_tx: broadcast::Sender<TimerEvent>,
    check_interval: Duration,
}

impl TimerEngine {
    /// Create a new engine.
    pub fn new(config: &EngineConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_buffer);

        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            event_tx,
            check_interval: config.check_interval,
        }
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Register a named entry.
    ///
    /// The specification is parsed up front (fails fast) and then bound
    /// to a seed derived from the entry name, so entries sharing a
    /// hash-token spec spread across different instants.
    pub async fn register(
        &self,
        name: impl Into<String>,
        spec: &str,
        defaults: ParameterMap,
        handler: Arc<dyn FireHandler>,
    ) -> Result<()> {
        let name = name.into();
        let schedule = ActiveSchedule::new(spec)?;
        schedule.bind_owner(&name);

        info!(
            entry = %name,
            lines = schedule.snapshot().len(),
            "Registered schedule entry"
        );

        self.entries.write().await.insert(
            name.clone(),
            TimerEntry {
                schedule: Arc::new(schedule),
                defaults,
                handler,
                last_fired: None,
            },
        );
        let _ = self.event_tx.send(TimerEvent::Registered { entry: name });
        Ok(())
    }

    /// Remove an entry. Returns whether it existed.
    pub async fn remove(&self, name: &str) -> bool {
        let removed = self.entries.write().await.remove(name).is_some();
        if removed {
            info!(entry = name, "Removed schedule entry");
            let _ = self.event_tx.send(TimerEvent::Removed {
                entry: name.to_string(),
            });
        }
        removed
    }

    /// The live schedule of a registered entry.
    pub async fn schedule(&self, name: &str) -> Option<Arc<ActiveSchedule>> {
        self.entries.read().await.get(name).map(|e| e.schedule.clone())
    }

    /// Evaluate all entries against one instant.
    ///
    /// Sampling may be finer than a minute; an entry fires at most once
    /// per instant. Public so an external clock can drive the engine
    /// directly.
    pub async fn tick(&self, at: TickInstant) {
        let mut due = Vec::new();
        {
            let mut entries = self.entries.write().await;
            for (name, entry) in entries.iter_mut() {
                if entry.last_fired == Some(at) {
                    continue;
                }
                if let Some(params) = entry.schedule.fire(&at, &entry.defaults) {
                    entry.last_fired = Some(at);
                    due.push((name.clone(), entry.handler.clone(), params));
                }
            }
        }

        // Handlers run outside the registry lock.
        for (name, handler, params) in due {
            debug!(entry = %name, "Firing schedule entry");
            handler.fire(&name, params.clone()).await;
            let _ = self.event_tx.send(TimerEvent::Fired {
                entry: name,
                at,
                params,
            });
        }
    }

    /// Run the evaluation loop until the shutdown signal.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        info!("Timer engine started");
        let mut interval = tokio::time::interval(self.check_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(TickInstant::from(Utc::now())).await;
                }
                _ = shutdown.recv() => {
                    info!("Timer engine shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingHandler {
        count: AtomicUsize,
        last_params: Mutex<Option<ParameterMap>>,
    }

    impl RecordingHandler {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                count: AtomicUsize::new(0),
                last_params: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl FireHandler for RecordingHandler {
        async fn fire(&self, _entry: &str, params: ParameterMap) {
            self.count.fetch_add(1, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params);
        }
    }

    fn engine() -> TimerEngine {
        TimerEngine::new(&EngineConfig::default())
    }

    #[tokio::test]
    async fn test_register_and_fire() {
        let engine = engine();
        let handler = RecordingHandler::new();
        let defaults = ParameterMap::from([("ENV", "staging")]);

        engine
            .register("deploy", "0 0 * * * ENV=prod", defaults, handler.clone())
            .await
            .unwrap();

        engine.tick(TickInstant::new(0, 0, 5, 5, 5)).await;

        assert_eq!(handler.count.load(Ordering::SeqCst), 1);
        let params = handler.last_params.lock().unwrap().clone().unwrap();
        assert_eq!(params.get("ENV"), Some("prod"));
    }

    #[tokio::test]
    async fn test_same_instant_fires_once() {
        let engine = engine();
        let handler = RecordingHandler::new();

        engine
            .register("job", "0 0 * * *", ParameterMap::new(), handler.clone())
            .await
            .unwrap();

        let at = TickInstant::new(0, 0, 5, 5, 5);
        engine.tick(at).await;
        engine.tick(at).await;

        assert_eq!(handler.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_matching_instant_does_not_fire() {
        let engine = engine();
        let handler = RecordingHandler::new();

        engine
            .register("job", "0 0 * * *", ParameterMap::new(), handler.clone())
            .await
            .unwrap();

        engine.tick(TickInstant::new(30, 12, 5, 5, 5)).await;
        assert_eq!(handler.count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_spec_rejected_at_register() {
        let engine = engine();
        let handler = RecordingHandler::new();
        let result = engine
            .register("bad", "61 * * * *", ParameterMap::new(), handler)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_entries_spread_by_name() {
        let engine = engine();
        let a = RecordingHandler::new();
        let b = RecordingHandler::new();

        engine
            .register("job-a", "H H * * *", ParameterMap::new(), a)
            .await
            .unwrap();
        engine
            .register("job-b", "H H * * *", ParameterMap::new(), b)
            .await
            .unwrap();

        let sched_a = engine.schedule("job-a").await.unwrap();
        let sched_b = engine.schedule("job-b").await.unwrap();
        // Owner-derived seeds differ, so the resolved lists do too.
        assert_ne!(sched_a.snapshot().seed(), sched_b.snapshot().seed());
    }

    #[tokio::test]
    async fn test_remove() {
        let engine = engine();
        let handler = RecordingHandler::new();

        engine
            .register("job", "* * * * *", ParameterMap::new(), handler.clone())
            .await
            .unwrap();
        assert!(engine.remove("job").await);
        assert!(!engine.remove("job").await);

        engine.tick(TickInstant::new(0, 0, 5, 5, 5)).await;
        assert_eq!(handler.count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_events_broadcast() {
        let engine = engine();
        let mut events = engine.subscribe();
        let handler = RecordingHandler::new();

        engine
            .register("job", "0 0 * * *", ParameterMap::new(), handler)
            .await
            .unwrap();
        engine.tick(TickInstant::new(0, 0, 5, 5, 5)).await;

        assert!(matches!(
            events.try_recv().unwrap(),
            TimerEvent::Registered { .. }
        ));
        assert!(matches!(events.try_recv().unwrap(), TimerEvent::Fired { .. }));
    }

    #[tokio::test]
    async fn test_closure_handler() {
        let engine = engine();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handler = Arc::new(ClosureHandler::new(move |_entry, _params| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        engine
            .register("job", "* * * * *", ParameterMap::new(), handler)
            .await
            .unwrap();
        engine.tick(TickInstant::new(7, 7, 7, 7, 0)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
